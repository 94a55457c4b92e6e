//! Multi-provider quote page.

use buzzgram_core::CategoryId;
use buzzgram_core::forms::GeneralQuoteForm;
use buzzgram_core::models::{Category, City, GeneralQuote, Subcategory};
use tracing::instrument;

use super::{Pickers, query_keys, record};
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

const QUOTE_FAILED: &str = "Failed to submit quote request. Please try again.";

pub struct QuotePage {
    app: App,
    pub form: GeneralQuoteForm,
    catalog: Pickers,
    pub error: Option<String>,
    /// The last submission went through.
    pub submitted: bool,
    submit_mutation: Mutation,
}

impl QuotePage {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            form: GeneralQuoteForm::default(),
            catalog: Pickers::default(),
            error: None,
            submitted: false,
            submit_mutation: Mutation::new(),
        }
    }

    /// Load the pickers and prefill contact details of a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the first failing catalog query's error.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        if let Some(user) = self.app.consumer.user().await
            && self.form.name.is_empty()
            && self.form.email.is_empty()
        {
            self.form = GeneralQuoteForm::for_contact(user.name, user.email);
        }
        self.catalog = Pickers::load(&self.app).await?;
        Ok(())
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.catalog.cities
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    #[must_use]
    pub fn subcategories(&self) -> Vec<&Subcategory> {
        self.catalog.subcategories_of(self.form.category_id())
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.form.select_category(category);
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit_mutation.is_pending()
    }

    /// Broadcast the request. On success the form is reset, keeping the
    /// contact fields for a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the server, otherwise the
    /// server's error.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<GeneralQuote, ClientError> {
        self.submitted = false;
        let result = match self.form.to_request() {
            Ok(request) => {
                let api = self.app.consumer.api();
                self.submit_mutation
                    .run(
                        &self.app.cache,
                        &[query_keys::all_general_quotes()],
                        async { api.create_general_quote(&request).await },
                    )
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, QUOTE_FAILED);
        let quote = result?;

        let signed_in = self.app.consumer.snapshot().await.is_authenticated();
        self.form.reset(signed_in);
        self.submitted = true;
        Ok(quote)
    }
}
