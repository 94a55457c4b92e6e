//! Account settings: change password, delete account.

use buzzgram_core::forms::{PasswordChange, validate_delete_password};
use buzzgram_core::guard::HOME_PATH;
use secrecy::SecretString;
use tracing::instrument;

use super::record;
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

pub const PASSWORD_CHANGED: &str = "Password changed successfully!";

pub struct SettingsPage {
    app: App,
    pub password: PasswordChange,
    pub delete_password: String,
    pub error: Option<String>,
    pub success: Option<String>,
    password_mutation: Mutation,
    delete_mutation: Mutation,
}

impl SettingsPage {
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            password: PasswordChange::default(),
            delete_password: String::new(),
            error: None,
            success: None,
            password_mutation: Mutation::new(),
            delete_mutation: Mutation::new(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.password_mutation.is_pending() || self.delete_mutation.is_pending()
    }

    /// Validate and submit the change-password form. The form is cleared on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns a validation error without calling the server, otherwise the
    /// server's error (e.g. a wrong current password).
    #[instrument(skip(self))]
    pub async fn change_password(&mut self) -> Result<(), ClientError> {
        self.success = None;
        let result = match self.password.validate() {
            Ok(()) => {
                let current = SecretString::from(self.password.current_password.clone());
                let new = SecretString::from(self.password.new_password.clone());
                let consumer = &self.app.consumer;
                self.password_mutation
                    .run(&self.app.cache, &[], async {
                        consumer.change_password(&current, &new).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, "Failed to change password");
        result?;

        self.password = PasswordChange::default();
        self.success = Some(PASSWORD_CHANGED.to_owned());
        Ok(())
    }

    /// Delete the account. On success the session is gone, every cached
    /// query is dropped, and the path to navigate to is returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty password, otherwise the
    /// server's error; the session is kept on failure.
    #[instrument(skip(self))]
    pub async fn delete_account(&mut self) -> Result<&'static str, ClientError> {
        self.success = None;
        let result = match validate_delete_password(&self.delete_password) {
            Ok(()) => {
                let password = SecretString::from(self.delete_password.clone());
                let consumer = &self.app.consumer;
                self.delete_mutation
                    .run(&self.app.cache, &[], async {
                        consumer.delete_account(&password).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        record(&mut self.error, &result, "Failed to delete account");
        result?;

        self.delete_password.clear();
        self.app.cache.invalidate_all().await;
        Ok(HOME_PATH)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use buzzgram_core::forms::ValidationError;

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    fn page() -> SettingsPage {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();
        SettingsPage::new(&app)
    }

    #[tokio::test]
    async fn test_password_validation_runs_before_request() {
        let mut page = page();
        page.password.current_password = "old-password".to_owned();
        page.password.new_password = "short".to_owned();
        page.password.confirm_new_password = "short".to_owned();

        let err = page.change_password().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::NewPasswordTooShort)
        ));
        assert_eq!(
            page.error.as_deref(),
            Some("New password must be at least 8 characters")
        );

        page.password.new_password = "long-enough".to_owned();
        page.password.confirm_new_password = "different!".to_owned();
        page.change_password().await.unwrap_err();
        assert_eq!(page.error.as_deref(), Some("New passwords do not match"));
    }

    #[tokio::test]
    async fn test_delete_requires_password() {
        let mut page = page();
        page.delete_account().await.unwrap_err();
        assert_eq!(page.error.as_deref(), Some("Password is required"));
    }

    #[tokio::test]
    async fn test_change_password_without_session() {
        let mut page = page();
        page.password.current_password = "old-password".to_owned();
        page.password.new_password = "new-password".to_owned();
        page.password.confirm_new_password = "new-password".to_owned();

        let err = page.change_password().await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert_eq!(page.error.as_deref(), Some("Failed to change password"));
        assert!(page.success.is_none());
    }
}
