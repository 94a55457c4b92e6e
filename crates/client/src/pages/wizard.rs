//! Owner listing forms: the three-step create wizard and the edit form.

use buzzgram_core::forms::{BusinessForm, ValidationError, WizardStep};
use buzzgram_core::models::{Business, Category, City, Subcategory};
use buzzgram_core::{BusinessId, CategoryId};
use tracing::instrument;

use super::{Pickers, query_keys, record};
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

/// Where both forms send the owner after a successful submit.
pub const OWNER_DASHBOARD_PATH: &str = "/business-owner/dashboard";

const CREATE_FAILED: &str = "Submission failed. Please try again.";
const UPDATE_FAILED: &str = "Update failed. Please try again.";
const BUSINESS: &str = "Business";

// =============================================================================
// Create
// =============================================================================

pub struct CreateBusinessWizard {
    app: App,
    step: WizardStep,
    pub form: BusinessForm,
    pickers: Pickers,
    pub error: Option<String>,
    submit_mutation: Mutation,
}

impl CreateBusinessWizard {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            step: WizardStep::default(),
            form: BusinessForm::default(),
            pickers: Pickers::default(),
            error: None,
            submit_mutation: Mutation::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the first failing catalog query's error.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.pickers = Pickers::load(&self.app).await?;
        Ok(())
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.pickers.cities
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.pickers.categories
    }

    /// Subcategories of the selected category.
    #[must_use]
    pub fn subcategories(&self) -> Vec<&Subcategory> {
        self.pickers.subcategories_of(self.form.category_id())
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.form.select_category(category);
    }

    /// Validate the current step and advance.
    ///
    /// # Errors
    ///
    /// Returns the step's first validation failure; the step is unchanged.
    pub fn next(&mut self) -> Result<WizardStep, ValidationError> {
        let checked = match self.step {
            WizardStep::Basics => self.form.validate_basics(),
            WizardStep::Details => self.form.validate_details(),
            WizardStep::Review => Ok(()),
        };
        self.error = checked.as_ref().err().map(ToString::to_string);
        checked?;
        self.step = self.step.next();
        Ok(self.step)
    }

    /// Go back a step. Never validates.
    pub fn back(&mut self) -> WizardStep {
        self.error = None;
        self.step = self.step.back();
        self.step
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit_mutation.is_pending()
    }

    /// Submit the listing for review, then refresh the owner's businesses.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any step is invalid, otherwise the
    /// server's error. `error` holds the message to show.
    #[instrument(skip(self), fields(name = %self.form.name))]
    pub async fn submit(&mut self) -> Result<Business, ClientError> {
        let result = match self.form.to_draft() {
            Ok(draft) => {
                let api = self.app.owner.api();
                self.submit_mutation
                    .run(&self.app.cache, &[query_keys::admin_approvals()], async {
                        api.create_business(&draft).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, CREATE_FAILED);

        let business = result?;
        tracing::info!(business_id = %business.id, "Business submitted for review");
        self.app.owner.refresh_businesses().await;
        Ok(business)
    }
}

// =============================================================================
// Edit
// =============================================================================

pub struct EditBusinessForm {
    app: App,
    id: BusinessId,
    business: Option<Business>,
    pub form: BusinessForm,
    pickers: Pickers,
    pub error: Option<String>,
    submit_mutation: Mutation,
}

impl EditBusinessForm {
    #[must_use]
    pub fn new(app: &App, id: BusinessId) -> Self {
        Self {
            app: app.clone(),
            id,
            business: None,
            form: BusinessForm::default(),
            pickers: Pickers::default(),
            error: None,
            submit_mutation: Mutation::new(),
        }
    }

    /// Find the listing among the owner's businesses and prefill the form.
    ///
    /// A listing the owner does not have leaves `business()` empty with
    /// `error` set to "Business not found".
    ///
    /// # Errors
    ///
    /// Returns the first failing catalog query's error.
    #[instrument(skip(self), fields(business_id = %self.id))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.app.owner.refresh_businesses().await;
        self.business = self
            .app
            .owner
            .my_businesses()
            .await
            .into_iter()
            .find(|b| b.id == self.id);

        match &self.business {
            Some(business) => {
                self.form = BusinessForm::from_business(business);
                self.error = None;
            }
            None => self.error = Some(ClientError::NotFound(BUSINESS).to_string()),
        }

        self.pickers = Pickers::load(&self.app).await?;
        Ok(())
    }

    #[must_use]
    pub const fn business(&self) -> Option<&Business> {
        self.business.as_ref()
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.pickers.cities
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.pickers.categories
    }

    #[must_use]
    pub fn subcategories(&self) -> Vec<&Subcategory> {
        self.pickers.subcategories_of(self.form.category_id())
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.form.select_category(category);
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit_mutation.is_pending()
    }

    /// Save the changes, then refresh the owner's businesses.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for a listing the owner does not
    /// have (no request is made), a validation error, otherwise the server's
    /// error.
    #[instrument(skip(self), fields(business_id = %self.id))]
    pub async fn submit(&mut self) -> Result<Business, ClientError> {
        if self.business.is_none() {
            let err = ClientError::NotFound(BUSINESS);
            self.error = Some(err.to_string());
            return Err(err);
        }
        let id = self.id;
        let result = match self.form.to_draft() {
            Ok(draft) => {
                let api = self.app.owner.api();
                self.submit_mutation
                    .run(
                        &self.app.cache,
                        &[query_keys::business(id), query_keys::businesses()],
                        async { api.update_business(id, &draft).await },
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, UPDATE_FAILED);

        let business = result?;
        self.app.owner.refresh_businesses().await;
        self.business = Some(business.clone());
        Ok(business)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use buzzgram_core::CityId;

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    fn wizard() -> CreateBusinessWizard {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();
        CreateBusinessWizard::new(&app)
    }

    #[test]
    fn test_next_blocks_on_invalid_step() {
        let mut wizard = wizard();
        assert_eq!(wizard.next(), Err(ValidationError::BusinessNameRequired));
        assert_eq!(wizard.step(), WizardStep::Basics);
        assert_eq!(wizard.error.as_deref(), Some("Business name is required"));

        wizard.form.name = "Glow Studio".to_owned();
        wizard.form.city_id = Some(CityId::new(1));
        wizard.select_category(Some(CategoryId::new(2)));
        assert_eq!(wizard.next(), Ok(WizardStep::Details));
        assert!(wizard.error.is_none());

        wizard.form.instagram_handle = "bad handle!".to_owned();
        assert_eq!(wizard.next(), Err(ValidationError::InvalidInstagramHandle));

        wizard.form.instagram_handle = "@glow.studio".to_owned();
        wizard.form.description = "x".repeat(50);
        assert_eq!(wizard.next(), Ok(WizardStep::Review));
        assert_eq!(wizard.back(), WizardStep::Details);
    }

    #[tokio::test]
    async fn test_submit_with_invalid_form_sets_error() {
        let mut wizard = wizard();
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::BusinessNameRequired)
        ));
        assert_eq!(wizard.error.as_deref(), Some("Business name is required"));
    }

    #[tokio::test]
    async fn test_edit_submit_without_owned_business_is_not_found() {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();
        let mut edit = EditBusinessForm::new(&app, BusinessId::new(4));

        let err = edit.submit().await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(edit.error.as_deref(), Some("Business not found"));
        assert!(!edit.is_submitting());
    }
}
