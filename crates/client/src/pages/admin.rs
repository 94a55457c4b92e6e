//! Admin dashboard and listing moderation.

use std::time::Duration;

use buzzgram_core::models::{AdminStats, Business, GeneralQuote, QuoteRequest, User};
use buzzgram_core::{BusinessId, BusinessStatus};
use tracing::instrument;

use super::{query_keys, record};
use crate::app::App;
use crate::cache::QueryKey;
use crate::error::ClientError;
use crate::mutation::Mutation;

/// How often the stats panel re-fetches while the dashboard is open.
pub const STATS_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

pub struct AdminDashboard {
    app: App,
    pub stats: AdminStats,
    pub users: Vec<User>,
    pub general_quotes: Vec<GeneralQuote>,
    pub business_quotes: Vec<QuoteRequest>,
}

impl AdminDashboard {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            stats: AdminStats::default(),
            users: Vec::new(),
            general_quotes: Vec::new(),
            business_quotes: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the first failing query's error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let api = self.app.consumer.api();
        let cache = &self.app.cache;
        let (stats, users, general_quotes, business_quotes) = tokio::try_join!(
            cache.fetch(query_keys::admin_stats(), || api.get_admin_stats()),
            cache.fetch(query_keys::all_users(), || api.get_all_users()),
            cache.fetch(query_keys::all_general_quotes(), || api.get_general_quotes()),
            cache.fetch(query_keys::all_business_quotes(), || {
                api.get_all_business_quotes()
            }),
        )?;

        self.stats = stats;
        self.users = users;
        self.general_quotes = general_quotes;
        self.business_quotes = business_quotes;
        Ok(())
    }

    /// Re-fetch the stats, bypassing the cache. Call every
    /// [`STATS_REFRESH_INTERVAL`].
    ///
    /// # Errors
    ///
    /// Returns the server's error; the previous stats are kept.
    pub async fn refresh_stats(&mut self) -> Result<&AdminStats, ClientError> {
        self.app.cache.invalidate(&query_keys::admin_stats()).await;
        let api = self.app.consumer.api();
        self.stats = self
            .app
            .cache
            .fetch(query_keys::admin_stats(), || api.get_admin_stats())
            .await?;
        Ok(&self.stats)
    }
}

/// Status an admin toggle moves a listing to.
#[must_use]
pub const fn toggled_status(current: BusinessStatus) -> BusinessStatus {
    match current {
        BusinessStatus::Active => BusinessStatus::Pending,
        _ => BusinessStatus::Active,
    }
}

/// Every listing, with status toggle and delete.
pub struct AdminBusinesses {
    app: App,
    businesses: Vec<Business>,
    pub error: Option<String>,
    status_mutation: Mutation,
    delete_mutation: Mutation,
}

impl AdminBusinesses {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            businesses: Vec::new(),
            error: None,
            status_mutation: Mutation::new(),
            delete_mutation: Mutation::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the server's error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let api = self.app.consumer.api();
        self.businesses = self
            .app
            .cache
            .fetch(query_keys::admin_businesses(), || api.get_admin_businesses())
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    /// Flip a listing between active and pending, then reload. Returns the
    /// new status, or `None` for an id not in the list.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    #[instrument(skip(self))]
    pub async fn toggle_status(
        &mut self,
        id: BusinessId,
    ) -> Result<Option<BusinessStatus>, ClientError> {
        let Some(current) = self.businesses.iter().find(|b| b.id == id) else {
            return Ok(None);
        };
        let next = toggled_status(current.effective_status());

        let api = self.app.consumer.api();
        let result = self
            .status_mutation
            .run(&self.app.cache, &Self::affected(), async {
                api.set_business_status(id, next).await
            })
            .await;
        record(&mut self.error, &result, "Failed to update business status");
        result?;

        self.load().await?;
        Ok(Some(next))
    }

    /// Delete a listing, then reload.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: BusinessId) -> Result<(), ClientError> {
        let api = self.app.consumer.api();
        let result = self
            .delete_mutation
            .run(&self.app.cache, &Self::affected(), async {
                api.delete_business(id).await
            })
            .await;
        record(&mut self.error, &result, "Failed to delete business");
        result?;

        self.load().await
    }

    fn affected() -> [QueryKey; 2] {
        [query_keys::admin_businesses(), query_keys::businesses()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_active_and_pending() {
        assert_eq!(toggled_status(BusinessStatus::Active), BusinessStatus::Pending);
        assert_eq!(toggled_status(BusinessStatus::Pending), BusinessStatus::Active);
        assert_eq!(toggled_status(BusinessStatus::Rejected), BusinessStatus::Active);
    }

    #[test]
    fn test_refresh_interval() {
        assert_eq!(STATS_REFRESH_INTERVAL.as_millis(), 30_000);
    }
}
