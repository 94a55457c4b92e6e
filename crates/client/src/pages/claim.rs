//! Claim an existing listing: search, pick, submit for review.

use buzzgram_core::forms::validate_search_name;
use buzzgram_core::models::{Business, ClaimRequest};
use buzzgram_core::{BusinessId, CityId};
use tracing::instrument;

use super::{query_keys, record};
use super::wizard::OWNER_DASHBOARD_PATH;
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

/// Shown when a search comes back empty.
pub const NO_RESULTS_MESSAGE: &str =
    "No businesses found. Try a different search or create a new business instead.";

pub struct ClaimBusinessFlow {
    app: App,
    pub search_name: String,
    pub city_id: Option<CityId>,
    results: Vec<Business>,
    selected: Option<BusinessId>,
    pub verification_message: String,
    /// Informational message (e.g. no results).
    pub notice: Option<String>,
    pub error: Option<String>,
    claim_mutation: Mutation,
}

impl ClaimBusinessFlow {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            search_name: String::new(),
            city_id: None,
            results: Vec::new(),
            selected: None,
            verification_message: String::new(),
            notice: None,
            error: None,
            claim_mutation: Mutation::new(),
        }
    }

    #[must_use]
    pub fn results(&self) -> &[Business] {
        &self.results
    }

    /// Search unclaimed listings by name, optionally within a city.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name (no request is made),
    /// otherwise the server's error.
    #[instrument(skip(self))]
    pub async fn search(&mut self) -> Result<&[Business], ClientError> {
        self.notice = None;
        self.selected = None;
        let result = match validate_search_name(&self.search_name) {
            Ok(name) => {
                self.app
                    .owner
                    .api()
                    .search_claimable_businesses(name, self.city_id)
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, "Search failed");

        self.results = result?;
        if self.results.is_empty() {
            self.notice = Some(NO_RESULTS_MESSAGE.to_owned());
        }
        Ok(&self.results)
    }

    /// Pick a search result to claim.
    pub fn select(&mut self, id: BusinessId) {
        if self.results.iter().any(|b| b.id == id) {
            self.selected = Some(id);
            self.error = None;
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Business> {
        self.selected
            .and_then(|id| self.results.iter().find(|b| b.id == id))
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.claim_mutation.is_pending()
    }

    /// Submit the claim for the selected listing with the owner's name and
    /// email, refresh the owner's businesses and return the path to go to
    /// next. Does nothing without a selection.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without an owner session,
    /// otherwise the server's error.
    #[instrument(skip(self))]
    pub async fn claim(&mut self) -> Result<Option<&'static str>, ClientError> {
        let Some(business_id) = self.selected else {
            return Ok(None);
        };
        let Some(owner) = self.app.owner.owner().await else {
            return Err(ClientError::NotAuthenticated);
        };

        let request = ClaimRequest {
            business_id,
            owner_name: owner.full_name(),
            owner_email: owner.email,
            verification_message: self.verification_message.trim().to_owned(),
        };
        let api = self.app.owner.api();
        let result = self
            .claim_mutation
            .run(&self.app.cache, &[query_keys::admin_approvals()], async {
                api.claim_business(&request).await
            })
            .await;
        record(&mut self.error, &result, "Claim submission failed");
        result?;

        tracing::info!(business_id = %business_id, "Claim submitted");
        self.app.owner.refresh_businesses().await;
        Ok(Some(OWNER_DASHBOARD_PATH))
    }
}
