//! Ownership claims submitted from the consumer domain.

use buzzgram_core::models::{BusinessClaim, ClaimRequest};
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, claim), fields(business_id = %claim.business_id))]
    pub async fn submit_business_claim(
        &self,
        claim: &ClaimRequest,
    ) -> Result<BusinessClaim, ClientError> {
        self.post("/business-claims", claim).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_my_claims(&self) -> Result<Vec<BusinessClaim>, ClientError> {
        self.get("/business-claims/my").await
    }
}
