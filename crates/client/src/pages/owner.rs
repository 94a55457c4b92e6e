//! Business-owner dashboard.

use buzzgram_core::filter::{BusinessGroups, group_by_status};
use buzzgram_core::identity::Identity;
use buzzgram_core::models::Business;

use crate::app::App;
use crate::error::ClientError;

pub struct OwnerDashboard {
    app: App,
    businesses: Vec<Business>,
}

impl OwnerDashboard {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            businesses: Vec::new(),
        }
    }

    /// Refresh the session's business list and take a copy.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without an owner session.
    /// Refresh failures are not errors: the previous list is shown.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        if !self.app.owner.snapshot().await.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }
        self.app.owner.refresh_businesses().await;
        self.businesses = self.app.owner.my_businesses().await;
        Ok(())
    }

    /// Greeting name of the signed-in owner.
    pub async fn greeting_name(&self) -> Option<String> {
        self.app
            .owner
            .owner()
            .await
            .map(|owner| owner.display_name().to_owned())
    }

    #[must_use]
    pub fn groups(&self) -> BusinessGroups<'_> {
        group_by_status(&self.businesses)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }
}
