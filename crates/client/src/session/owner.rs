//! Business-owner session.
//!
//! Parallel to the consumer session but with its own token key and profile.
//! Holding an owner identity is the capability; there is no role and no
//! admin escalation. The session also keeps the owner's businesses, which
//! pages refresh after every create, claim or edit.

use std::sync::Arc;

use buzzgram_core::identity::OwnerState;
use buzzgram_core::models::{Business, BusinessOwner};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{discard_token, load_token, persist_token};
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::storage::{LocalStore, keys};

/// `data` of the owner login and signup endpoints.
#[derive(Deserialize)]
struct OwnerAuthPayload {
    owner: BusinessOwner,
    token: String,
}

/// `data` of `GET /auth/business-owner/me`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerProfile {
    #[serde(flatten)]
    owner: BusinessOwner,
    #[serde(default)]
    my_businesses: Option<Vec<Business>>,
}

/// Business-owner identity.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct OwnerSession {
    inner: Arc<OwnerSessionInner>,
}

struct OwnerSessionInner {
    api: ApiClient,
    store: Arc<dyn LocalStore>,
    state: RwLock<OwnerState>,
    businesses: RwLock<Vec<Business>>,
}

impl OwnerSession {
    /// Create a session in the loading state. Call [`OwnerSession::init`] to
    /// hydrate it.
    ///
    /// The session takes a [scoped](ApiClient::scoped) copy of `api`.
    #[must_use]
    pub fn new(api: &ApiClient, store: Arc<dyn LocalStore>) -> Self {
        Self {
            inner: Arc::new(OwnerSessionInner {
                api: api.scoped(),
                store,
                state: RwLock::new(OwnerState::loading()),
                businesses: RwLock::new(Vec::new()),
            }),
        }
    }

    /// HTTP client carrying this session's bearer token.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub async fn snapshot(&self) -> OwnerState {
        self.inner.state.read().await.clone()
    }

    pub async fn owner(&self) -> Option<BusinessOwner> {
        self.inner.state.read().await.owner.clone()
    }

    /// Businesses as of the last hydration or refresh.
    pub async fn my_businesses(&self) -> Vec<Business> {
        self.inner.businesses.read().await.clone()
    }

    /// Hydrate from the persisted token, seeding the business list.
    ///
    /// Same contract as the consumer session: no token means no request, a
    /// rejected token is discarded, and it never fails.
    #[instrument(skip(self))]
    pub async fn init(&self) -> OwnerState {
        let Some(token) = load_token(self.inner.store.as_ref(), keys::OWNER_TOKEN) else {
            self.reset().await;
            return self.snapshot().await;
        };

        self.inner.api.set_token(token).await;
        match self
            .inner
            .api
            .get::<OwnerProfile>("/auth/business-owner/me")
            .await
        {
            Ok(profile) => {
                tracing::debug!(owner_id = %profile.owner.id, "Restored business owner session");
                *self.inner.businesses.write().await = profile.my_businesses.unwrap_or_default();
                *self.inner.state.write().await = OwnerState {
                    owner: Some(profile.owner),
                    loading: false,
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted business owner token rejected, signing out");
                discard_token(self.inner.store.as_ref(), keys::OWNER_TOKEN);
                self.reset().await;
            }
        }
        self.snapshot().await
    }

    /// # Errors
    ///
    /// Returns the server's error unchanged; state is untouched on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<BusinessOwner, ClientError> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        let payload: OwnerAuthPayload = self
            .inner
            .api
            .post("/auth/business-owner/login", &body)
            .await?;
        Ok(self.establish(payload).await)
    }

    /// # Errors
    ///
    /// Returns the server's error unchanged; state is untouched on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        email: &str,
        password: &SecretString,
        first_name: &str,
        last_name: &str,
    ) -> Result<BusinessOwner, ClientError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "firstName": first_name,
            "lastName": last_name,
        });
        let payload: OwnerAuthPayload = self
            .inner
            .api
            .post("/auth/business-owner/signup", &body)
            .await?;
        Ok(self.establish(payload).await)
    }

    /// Clear profile, token and businesses.
    ///
    /// When a token was held the server is told too; that call is best
    /// effort and only logged on failure. Safe to call repeatedly.
    pub async fn logout(&self) {
        if self.inner.api.has_token().await
            && let Err(e) = self
                .inner
                .api
                .execute::<()>(Method::POST, "/auth/business-owner/logout", None)
                .await
        {
            tracing::warn!(error = %e, "Business owner logout request failed");
        }

        discard_token(self.inner.store.as_ref(), keys::OWNER_TOKEN);
        self.reset().await;
    }

    /// Reload the business list. Failures are logged and keep the previous
    /// list; without a token this does nothing.
    #[instrument(skip(self))]
    pub async fn refresh_businesses(&self) {
        if !self.inner.api.has_token().await {
            return;
        }
        match self.inner.api.get_my_businesses().await {
            Ok(businesses) => *self.inner.businesses.write().await = businesses,
            Err(e) => tracing::error!(error = %e, "Failed to refresh businesses"),
        }
    }

    async fn reset(&self) {
        self.inner.api.clear_token().await;
        self.inner.businesses.write().await.clear();
        *self.inner.state.write().await = OwnerState::signed_out();
    }

    async fn establish(&self, payload: OwnerAuthPayload) -> BusinessOwner {
        persist_token(self.inner.store.as_ref(), keys::OWNER_TOKEN, &payload.token);
        self.inner
            .api
            .set_token(SecretString::from(payload.token))
            .await;
        // A previous owner's list must not leak into this login.
        self.inner.businesses.write().await.clear();
        *self.inner.state.write().await = OwnerState {
            owner: Some(payload.owner.clone()),
            loading: false,
        };
        payload.owner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    #[test]
    fn test_profile_payload_carries_businesses() {
        let profile: OwnerProfile = serde_json::from_value(json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "email": "sam@shop.com",
            "firstName": "Sam",
            "lastName": "Lee",
            "myBusinesses": [
                { "id": 1, "name": "Glow", "cityId": 1, "categoryId": 2, "status": "pending" }
            ]
        }))
        .unwrap();
        assert_eq!(profile.owner.full_name(), "Sam Lee");
        assert_eq!(profile.my_businesses.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_noop() {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(&config).unwrap();
        let session = OwnerSession::new(&api, Arc::new(MemoryStore::new()));

        assert_eq!(session.init().await, OwnerState::signed_out());
        session.refresh_businesses().await;
        assert!(session.my_businesses().await.is_empty());

        // No token, so logout makes no request either.
        session.logout().await;
        assert_eq!(session.snapshot().await, OwnerState::signed_out());
    }
}
