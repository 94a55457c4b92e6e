//! Consumer account endpoints that do not change the session.

use buzzgram_core::forms::RegistrationRequest;
use buzzgram_core::models::User;
use reqwest::Method;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// Profile for the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response
    /// (401 for a missing or rejected token).
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<User, ClientError> {
        self.get("/auth/me").await
    }

    /// Registration page submission. The account must confirm its email
    /// before it can sign in, so no session is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn submit_registration(
        &self,
        request: &RegistrationRequest,
    ) -> Result<(), ClientError> {
        self.execute(Method::POST, "/auth/register", Some(request))
            .await
    }
}
