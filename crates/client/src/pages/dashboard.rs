//! Consumer dashboard: favorites and sent quote requests.

use buzzgram_core::BusinessId;
use buzzgram_core::models::{Favorite, QuoteRequest};
use tracing::instrument;

use super::{query_keys, record};
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

pub struct UserDashboard {
    app: App,
    favorites: Vec<Favorite>,
    quotes: Vec<QuoteRequest>,
    pub error: Option<String>,
    remove_mutation: Mutation,
}

impl UserDashboard {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            favorites: Vec::new(),
            quotes: Vec::new(),
            error: None,
            remove_mutation: Mutation::new(),
        }
    }

    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when signed out, otherwise
    /// the first failing query's error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        if !self.app.consumer.snapshot().await.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let api = self.app.consumer.api();
        let (favorites, quotes) = tokio::try_join!(
            self.app
                .cache
                .fetch(query_keys::favorites(), || api.get_favorites()),
            self.app
                .cache
                .fetch(query_keys::my_quotes(), || api.get_my_quotes()),
        )?;
        self.favorites = favorites;
        self.quotes = quotes;
        Ok(())
    }

    #[must_use]
    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    #[must_use]
    pub fn quotes(&self) -> &[QuoteRequest] {
        &self.quotes
    }

    /// Unfavorite from the dashboard list.
    ///
    /// # Errors
    ///
    /// Returns the server's error; the list is kept on failure.
    #[instrument(skip(self))]
    pub async fn remove_favorite(&mut self, business_id: BusinessId) -> Result<(), ClientError> {
        let api = self.app.consumer.api();
        let result = self
            .remove_mutation
            .run(&self.app.cache, &[query_keys::favorites()], async {
                api.remove_favorite(business_id).await
            })
            .await;
        record(&mut self.error, &result, "Failed to remove favorite");
        result?;

        self.favorites.retain(|f| f.business_id != business_id);
        Ok(())
    }
}
