//! Business-owner listing management.

use buzzgram_core::models::{Business, BusinessDraft, ClaimRequest};
use buzzgram_core::{BusinessId, CityId};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnerSearchQuery<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    city_id: Option<CityId>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_my_businesses(&self) -> Result<Vec<Business>, ClientError> {
        self.get("/owner/my-businesses").await
    }

    /// Unclaimed listings matching `name`, optionally within a city.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn search_claimable_businesses(
        &self,
        name: &str,
        city_id: Option<CityId>,
    ) -> Result<Vec<Business>, ClientError> {
        self.get_with_query("/owner/businesses/search", &OwnerSearchQuery { name, city_id })
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, claim), fields(business_id = %claim.business_id))]
    pub async fn claim_business(&self, claim: &ClaimRequest) -> Result<(), ClientError> {
        self.execute(Method::POST, "/owner/claim", Some(claim)).await
    }

    /// Submit a new listing for review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_business(&self, draft: &BusinessDraft) -> Result<Business, ClientError> {
        self.post("/owner/businesses", draft).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, draft), fields(business_id = %id))]
    pub async fn update_business(
        &self,
        id: BusinessId,
        draft: &BusinessDraft,
    ) -> Result<Business, ClientError> {
        self.put(&format!("/owner/businesses/{id}"), draft).await
    }
}
