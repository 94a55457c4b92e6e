//! Registration page, with Google sign-up as the alternative.

use buzzgram_core::UserType;
use buzzgram_core::forms::RegistrationForm;
use tracing::instrument;

use super::record;
use crate::app::App;
use crate::error::ClientError;
use crate::federated::GoogleSignIn;
use crate::mutation::Mutation;
use crate::session::FederatedProfile;

const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

pub struct RegisterPage {
    app: App,
    pub form: RegistrationForm,
    pub error: Option<String>,
    /// The account was created; the page shows its confirmation screen.
    pub registered: bool,
    submit_mutation: Mutation,
}

impl RegisterPage {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            form: RegistrationForm::default(),
            error: None,
            registered: false,
            submit_mutation: Mutation::new(),
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit_mutation.is_pending()
    }

    /// Validate and create the account. No session is started.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the server, otherwise the
    /// server's error.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let result = match self.form.to_request() {
            Ok(request) => {
                let api = &self.app.api;
                self.submit_mutation
                    .run(&self.app.cache, &[], async {
                        api.submit_registration(&request).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, REGISTRATION_FAILED);
        result?;

        tracing::info!(email = %self.form.email, "Account registered");
        self.registered = true;
        Ok(())
    }

    /// Exchange a Google credential, passing the selected account type and
    /// any owner fields already typed in. Returns the landing path for the
    /// signed-in role. A successful sign-in lets the widget auto-select the
    /// account again.
    ///
    /// # Errors
    ///
    /// Returns the server's error; it is also reported to the sign-in
    /// widget.
    #[instrument(skip_all)]
    pub async fn google_sign_in(&mut self, credential: &str) -> Result<&'static str, ClientError> {
        let profile = (self.form.user_type == Some(UserType::BusinessOwner)).then(|| {
            FederatedProfile {
                business_name: non_empty(&self.form.business_name),
                instagram_handle: non_empty(&self.form.instagram_handle),
                phone: non_empty(&self.form.phone),
            }
        });

        let result = self
            .app
            .consumer
            .federated_login(credential, self.form.user_type, profile)
            .await;
        record(&mut self.error, &result, GoogleSignIn::AUTH_FAILED);
        if let Some(message) = &self.error {
            self.app.google.report_error(message);
        }

        let user = result?;
        self.app.google.enable_auto_select();
        Ok(user.role.landing_path())
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_owner_fields_required_before_request() {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();
        let mut page = RegisterPage::new(&app);

        page.submit().await.unwrap_err();
        assert_eq!(
            page.error.as_deref(),
            Some("Please select whether you are a customer or business owner")
        );

        page.form.user_type = Some(UserType::BusinessOwner);
        page.form.password = "password123".to_owned();
        page.form.confirm_password = "password123".to_owned();
        page.submit().await.unwrap_err();
        assert_eq!(
            page.error.as_deref(),
            Some("Business name is required for business owners")
        );
        assert!(!page.registered);
    }
}
