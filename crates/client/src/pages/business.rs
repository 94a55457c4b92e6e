//! Business detail page: listing, favorite toggle and quote form.

use buzzgram_core::forms::ValidationError;
use buzzgram_core::models::{Business, NewQuoteRequest, QuoteRequest, User};
use buzzgram_core::{BusinessId, Email};
use tracing::instrument;

use super::{query_keys, record};
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

const NOT_FOUND: &str = "Business not found";
const FAVORITE_FAILED: &str = "Failed to update favorites";
const QUOTE_FAILED: &str = "Failed to submit quote request. Please try again.";

/// Quote request addressed to the business on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessQuoteForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl BusinessQuoteForm {
    /// Form prefilled with the signed-in user's contact details.
    #[must_use]
    pub fn for_user(user: Option<&User>) -> Self {
        user.map_or_else(Self::default, |user| Self {
            name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        })
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Email`] for an invalid email.
    pub fn to_request(&self, business_id: BusinessId) -> Result<NewQuoteRequest, ValidationError> {
        let email = Email::parse(&self.email)?;
        let phone = self.phone.trim();
        Ok(NewQuoteRequest {
            business_id,
            name: self.name.trim().to_owned(),
            email: email.into_inner(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
            message: self.message.clone(),
        })
    }
}

pub struct BusinessDetailPage {
    app: App,
    id: BusinessId,
    business: Option<Business>,
    favorited: Option<bool>,
    pub quote: BusinessQuoteForm,
    /// Set after a quote went through, until the next submission.
    pub quote_sent: bool,
    pub error: Option<String>,
    favorite_mutation: Mutation,
    quote_mutation: Mutation,
}

impl BusinessDetailPage {
    #[must_use]
    pub fn new(app: &App, id: BusinessId) -> Self {
        Self {
            app: app.clone(),
            id,
            business: None,
            favorited: None,
            quote: BusinessQuoteForm::default(),
            quote_sent: false,
            error: None,
            favorite_mutation: Mutation::new(),
            quote_mutation: Mutation::new(),
        }
    }

    /// Load the listing, and the favorite flag for a signed-in consumer.
    ///
    /// # Errors
    ///
    /// Returns the listing query's error; `error` then reads
    /// "Business not found" unless the server said otherwise.
    #[instrument(skip(self), fields(business_id = %self.id))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let id = self.id;
        let api = &self.app.api;
        let result = self
            .app
            .cache
            .fetch(query_keys::business(id), || api.get_business(id))
            .await;
        record(&mut self.error, &result, NOT_FOUND);
        self.business = Some(result?);

        let user = self.app.consumer.user().await;
        self.quote = BusinessQuoteForm::for_user(user.as_ref());
        self.favorited = if user.is_some() {
            self.fetch_favorited().await
        } else {
            None
        };
        Ok(())
    }

    /// Favorite lookups are cosmetic; failures read as unknown.
    async fn fetch_favorited(&self) -> Option<bool> {
        let id = self.id;
        let api = self.app.consumer.api();
        match self
            .app
            .cache
            .fetch(query_keys::favorite_check(id), || api.check_favorite(id))
            .await
        {
            Ok(favorited) => Some(favorited),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check favorite status");
                None
            }
        }
    }

    #[must_use]
    pub const fn business(&self) -> Option<&Business> {
        self.business.as_ref()
    }

    /// Whether the signed-in consumer has favorited this business. `None`
    /// when signed out or unknown.
    #[must_use]
    pub const fn is_favorited(&self) -> Option<bool> {
        self.favorited
    }

    #[must_use]
    pub fn favorite_pending(&self) -> bool {
        self.favorite_mutation.is_pending()
    }

    #[must_use]
    pub fn quote_pending(&self) -> bool {
        self.quote_mutation.is_pending()
    }

    /// Add or remove the favorite. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when signed out (the caller
    /// sends the user to the login page), otherwise the server's error.
    #[instrument(skip(self), fields(business_id = %self.id))]
    pub async fn toggle_favorite(&mut self) -> Result<bool, ClientError> {
        if !self.app.consumer.snapshot().await.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }

        let id = self.id;
        let api = self.app.consumer.api();
        let target = !self.favorited.unwrap_or(false);
        let result = self
            .favorite_mutation
            .run(&self.app.cache, &[query_keys::favorites()], async {
                if target {
                    api.add_favorite(id).await
                } else {
                    api.remove_favorite(id).await
                }
            })
            .await;
        record(&mut self.error, &result, FAVORITE_FAILED);
        result?;

        self.favorited = Some(target);
        Ok(target)
    }

    /// Send the quote form to this business.
    ///
    /// # Errors
    ///
    /// Returns the validation error for a bad email, otherwise the server's
    /// error.
    #[instrument(skip(self), fields(business_id = %self.id))]
    pub async fn submit_quote(&mut self) -> Result<QuoteRequest, ClientError> {
        self.quote_sent = false;
        let result = match self.quote.to_request(self.id) {
            Ok(request) => {
                let api = self.app.consumer.api();
                self.quote_mutation
                    .run(&self.app.cache, &[query_keys::my_quotes()], async {
                        api.create_quote_request(&request).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, QUOTE_FAILED);

        let created = result?;
        let user = self.app.consumer.user().await;
        self.quote = BusinessQuoteForm::for_user(user.as_ref());
        self.quote_sent = true;
        Ok(created)
    }
}
