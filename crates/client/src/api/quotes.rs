//! Quote requests: per-business and multi-provider.

use buzzgram_core::models::{GeneralQuote, NewGeneralQuote, NewQuoteRequest, QuoteRequest};
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, request), fields(business_id = %request.business_id))]
    pub async fn create_quote_request(
        &self,
        request: &NewQuoteRequest,
    ) -> Result<QuoteRequest, ClientError> {
        self.post("/quote-requests", request).await
    }

    /// The signed-in consumer's quote requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_my_quotes(&self) -> Result<Vec<QuoteRequest>, ClientError> {
        self.get("/quote-requests/my").await
    }

    /// Broadcast a request to every provider in a subcategory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, request), fields(subcategory_id = %request.subcategory_id))]
    pub async fn create_general_quote(
        &self,
        request: &NewGeneralQuote,
    ) -> Result<GeneralQuote, ClientError> {
        self.post("/general-quotes", request).await
    }

    /// All multi-provider requests (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_general_quotes(&self) -> Result<Vec<GeneralQuote>, ClientError> {
        self.get("/general-quotes").await
    }
}
