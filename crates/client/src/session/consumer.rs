//! Consumer/admin session.

use std::sync::Arc;

use buzzgram_core::identity::ConsumerState;
use buzzgram_core::models::User;
use buzzgram_core::{Role, UserType};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{discard_token, load_token, persist_token};
use crate::cache::QueryCache;
use crate::error::ClientError;
use crate::federated::FederatedIdentity;
use crate::http::ApiClient;
use crate::pages::query_keys;
use crate::storage::{LocalStore, keys};

/// `data` of the login, register and Google endpoints.
#[derive(Deserialize)]
struct AuthPayload {
    user: User,
    token: String,
}

/// Extra fields sent with a first federated sign-in as a business owner.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FederatedRequest<'a> {
    credential: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type: Option<UserType>,
    #[serde(flatten)]
    profile: FederatedProfile,
}

/// Consumer/admin identity.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ConsumerSession {
    inner: Arc<ConsumerSessionInner>,
}

struct ConsumerSessionInner {
    api: ApiClient,
    store: Arc<dyn LocalStore>,
    federated: Arc<dyn FederatedIdentity>,
    cache: QueryCache,
    state: RwLock<ConsumerState>,
}

impl ConsumerSession {
    /// Create a session in the loading state. Call [`ConsumerSession::init`]
    /// to hydrate it.
    ///
    /// The session takes a [scoped](ApiClient::scoped) copy of `api`.
    /// Queries tied to the signed-in user are dropped from `cache` whenever
    /// the identity changes.
    #[must_use]
    pub fn new(
        api: &ApiClient,
        store: Arc<dyn LocalStore>,
        federated: Arc<dyn FederatedIdentity>,
        cache: QueryCache,
    ) -> Self {
        Self {
            inner: Arc::new(ConsumerSessionInner {
                api: api.scoped(),
                store,
                federated,
                cache,
                state: RwLock::new(ConsumerState::loading()),
            }),
        }
    }

    /// HTTP client carrying this session's bearer token.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub async fn snapshot(&self) -> ConsumerState {
        self.inner.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.state.read().await.user.clone()
    }

    /// Hydrate from the persisted token.
    ///
    /// Without a token no request is made. A token the server does not
    /// accept is discarded. Never fails: every path ends signed in or
    /// signed out, with `loading == false`.
    #[instrument(skip(self))]
    pub async fn init(&self) -> ConsumerState {
        let Some(token) = load_token(self.inner.store.as_ref(), keys::CONSUMER_TOKEN) else {
            self.inner.api.clear_token().await;
            *self.inner.state.write().await = ConsumerState::signed_out();
            return self.snapshot().await;
        };

        self.inner.api.set_token(token).await;
        match self.inner.api.get::<User>("/auth/me").await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Restored consumer session");
                *self.inner.state.write().await = ConsumerState {
                    user: Some(user),
                    loading: false,
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted consumer token rejected, signing out");
                discard_token(self.inner.store.as_ref(), keys::CONSUMER_TOKEN);
                self.inner.api.clear_token().await;
                *self.inner.state.write().await = ConsumerState::signed_out();
            }
        }
        self.snapshot().await
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns the server's error unchanged; state is untouched on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, ClientError> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        let payload: AuthPayload = self.inner.api.post("/auth/login", &body).await?;
        Ok(self.establish(payload).await)
    }

    /// Create an account and sign in. `role` defaults to `user`.
    ///
    /// # Errors
    ///
    /// Returns the server's error unchanged; state is untouched on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        name: &str,
        role: Option<Role>,
    ) -> Result<User, ClientError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "name": name,
            "role": role.unwrap_or_default(),
        });
        let payload: AuthPayload = self.inner.api.post("/auth/register", &body).await?;
        Ok(self.establish(payload).await)
    }

    /// Exchange a federated credential for a session.
    ///
    /// # Errors
    ///
    /// Returns the server's error unchanged; state is untouched on failure.
    #[instrument(skip(self, credential, profile))]
    pub async fn federated_login(
        &self,
        credential: &str,
        intended: Option<UserType>,
        profile: Option<FederatedProfile>,
    ) -> Result<User, ClientError> {
        let body = FederatedRequest {
            credential,
            user_type: intended,
            profile: profile.unwrap_or_default(),
        };
        let payload: AuthPayload = self.inner.api.post("/auth/google", &body).await?;
        Ok(self.establish(payload).await)
    }

    /// Clear profile, token and the user's cached queries, and stop the
    /// federated provider from auto-selecting. Safe to call repeatedly.
    pub async fn logout(&self) {
        *self.inner.state.write().await = ConsumerState::signed_out();
        self.inner.api.clear_token().await;
        discard_token(self.inner.store.as_ref(), keys::CONSUMER_TOKEN);
        self.forget_cached_queries().await;
        self.inner.federated.disable_auto_select();
    }

    /// Swap in a fresher profile (e.g. after a profile edit).
    pub async fn replace_user(&self, user: User) {
        let mut state = self.inner.state.write().await;
        state.user = Some(user);
        state.loading = false;
    }

    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without a token, otherwise the
    /// server's error.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<(), ClientError> {
        self.require_token().await?;
        let body = json!({
            "currentPassword": current.expose_secret(),
            "newPassword": new.expose_secret(),
        });
        self.inner
            .api
            .execute(Method::POST, "/auth/change-password", Some(&body))
            .await
    }

    /// Delete the account, then sign out.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without a token, otherwise the
    /// server's error. The session is kept on failure.
    #[instrument(skip_all)]
    pub async fn delete_account(&self, password: &SecretString) -> Result<(), ClientError> {
        self.require_token().await?;
        let body = json!({ "password": password.expose_secret() });
        self.inner
            .api
            .execute(Method::DELETE, "/auth/delete-account", Some(&body))
            .await?;
        self.logout().await;
        Ok(())
    }

    async fn require_token(&self) -> Result<(), ClientError> {
        if self.inner.api.has_token().await {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }

    async fn forget_cached_queries(&self) {
        for prefix in query_keys::consumer_scoped() {
            self.inner.cache.invalidate(&prefix).await;
        }
    }

    async fn establish(&self, payload: AuthPayload) -> User {
        self.forget_cached_queries().await;
        persist_token(
            self.inner.store.as_ref(),
            keys::CONSUMER_TOKEN,
            &payload.token,
        );
        self.inner
            .api
            .set_token(SecretString::from(payload.token))
            .await;
        *self.inner.state.write().await = ConsumerState {
            user: Some(payload.user.clone()),
            loading: false,
        };
        payload.user
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buzzgram_core::ApprovalStatus;

    use super::*;
    use crate::config::ClientConfig;
    use crate::federated::NoopFederated;
    use crate::storage::MemoryStore;

    fn session(store: Arc<MemoryStore>) -> ConsumerSession {
        // Nothing listens here; tests below never reach the network.
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(&config).unwrap();
        ConsumerSession::new(&api, store, Arc::new(NoopFederated), QueryCache::default())
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let session = session(Arc::new(MemoryStore::new()));
        assert!(session.snapshot().await.loading);
    }

    #[tokio::test]
    async fn test_init_without_token_signs_out() {
        let session = session(Arc::new(MemoryStore::new()));
        let state = session.init().await;
        assert_eq!(state, ConsumerState::signed_out());
        assert!(!session.api().has_token().await);
    }

    #[tokio::test]
    async fn test_change_password_requires_token() {
        let session = session(Arc::new(MemoryStore::new()));
        session.init().await;
        let err = session
            .change_password(&SecretString::from("old"), &SecretString::from("new-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = Arc::new(MemoryStore::with_entries([(keys::CONSUMER_TOKEN, "t")]));
        let session = session(Arc::clone(&store));
        session.logout().await;
        session.logout().await;
        assert_eq!(store.get(keys::CONSUMER_TOKEN).unwrap(), None);
        assert_eq!(session.snapshot().await, ConsumerState::signed_out());
    }

    #[tokio::test]
    async fn test_logout_drops_user_queries_only() {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(&config).unwrap();
        let cache = QueryCache::default();
        let session = ConsumerSession::new(
            &api,
            Arc::new(MemoryStore::new()),
            Arc::new(NoopFederated),
            cache.clone(),
        );
        cache.set(query_keys::favorites(), vec![1_u8]).await;
        cache.set(query_keys::admin_approvals_by_status(ApprovalStatus::Pending), 2_u8).await;
        cache.set(query_keys::cities(), 3_u8).await;

        session.logout().await;

        assert_eq!(cache.get::<Vec<u8>>(&query_keys::favorites()).await, None);
        assert_eq!(
            cache
                .get::<u8>(&query_keys::admin_approvals_by_status(ApprovalStatus::Pending))
                .await,
            None
        );
        assert_eq!(cache.get::<u8>(&query_keys::cities()).await, Some(3));
    }

    #[test]
    fn test_federated_request_shape() {
        let body = FederatedRequest {
            credential: "jwt",
            user_type: Some(UserType::BusinessOwner),
            profile: FederatedProfile {
                business_name: Some("Glow".to_string()),
                ..FederatedProfile::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "credential": "jwt", "userType": "business_owner", "businessName": "Glow" })
        );
    }
}
