//! Consumer favorites.

use buzzgram_core::BusinessId;
use buzzgram_core::models::Favorite;
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteCheck {
    is_favorited: bool,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        self.get("/favorites").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn add_favorite(&self, business_id: BusinessId) -> Result<(), ClientError> {
        self.execute::<()>(Method::POST, &format!("/favorites/{business_id}"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn remove_favorite(&self, business_id: BusinessId) -> Result<(), ClientError> {
        self.delete(&format!("/favorites/{business_id}")).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(business_id = %business_id))]
    pub async fn check_favorite(&self, business_id: BusinessId) -> Result<bool, ClientError> {
        let check: FavoriteCheck = self
            .get(&format!("/favorites/check/{business_id}"))
            .await?;
        Ok(check.is_favorited)
    }
}
