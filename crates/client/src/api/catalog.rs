//! Public catalog: cities, categories, subcategories and businesses.

use buzzgram_core::BusinessId;
use buzzgram_core::models::{Business, BusinessSearchParams, Category, City, Subcategory};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

/// Body of `GET /health` (not enveloped).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_cities(&self) -> Result<Vec<City>, ClientError> {
        self.get("/cities").await
    }

    /// Categories, each with its subcategories when the server embeds them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get("/categories").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        self.get("/subcategories").await
    }

    /// Businesses matching `params`; unset fields are not sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_businesses(
        &self,
        params: &BusinessSearchParams,
    ) -> Result<Vec<Business>, ClientError> {
        self.get_with_query("/businesses", params).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response
    /// (404 for an unknown id).
    #[instrument(skip(self), fields(business_id = %id))]
    pub async fn get_business(&self, id: BusinessId) -> Result<Business, ClientError> {
        self.get(&format!("/businesses/{id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        self.get_raw("/health").await
    }
}
