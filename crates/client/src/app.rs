//! Process-wide client context.
//!
//! Built once at startup and passed to every page: the public API client,
//! both session stores, the query cache and the persisted store.

use std::sync::Arc;

use buzzgram_core::guard::GuardOutcome;
use buzzgram_core::identity::{ConsumerState, OwnerState};
use buzzgram_core::routes;

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::federated::GoogleSignIn;
use crate::http::ApiClient;
use crate::session::{ConsumerSession, OwnerSession};
use crate::storage::{FileStore, LocalStore};

/// Everything a page needs.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct App {
    pub config: Arc<ClientConfig>,
    /// Client without a token, for public endpoints.
    pub api: ApiClient,
    pub consumer: ConsumerSession,
    pub owner: OwnerSession,
    pub cache: QueryCache,
    pub store: Arc<dyn LocalStore>,
    pub google: Arc<GoogleSignIn>,
}

impl App {
    /// Build the context over an explicit store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, store: Arc<dyn LocalStore>) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config)?;
        let cache = QueryCache::new(config.cache_ttl);
        let google = Arc::new(GoogleSignIn::new(config.google_client_id.clone()));
        let consumer = ConsumerSession::new(
            &api,
            Arc::clone(&store),
            Arc::clone(&google) as _,
            cache.clone(),
        );
        let owner = OwnerSession::new(&api, Arc::clone(&store));

        Ok(Self {
            config: Arc::new(config),
            api,
            consumer,
            owner,
            cache,
            store,
            google,
        })
    }

    /// Build the context over the configured state file.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(config.state_file.clone()));
        Self::new(config, store)
    }

    /// Resolve the sign-in widget and hydrate both sessions concurrently.
    pub async fn init(&self) -> (ConsumerState, OwnerState) {
        self.google.initialize();
        tokio::join!(self.consumer.init(), self.owner.init())
    }

    /// Guard decision for navigating to `path` with the current sessions.
    pub async fn guard(&self, path: &str) -> GuardOutcome {
        let consumer = self.consumer.snapshot().await;
        let owner = self.owner.snapshot().await;
        routes::decide_path(path, self.config.owner_guard, &consumer, &owner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buzzgram_core::guard::{CONSUMER_LOGIN_PATH, OWNER_LOGIN_PATH};

    use super::*;
    use crate::federated::WidgetState;
    use crate::storage::MemoryStore;

    fn app() -> App {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        App::new(config, Arc::new(MemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_guard_spinner_before_init() {
        let app = app();
        assert_eq!(app.guard("/dashboard").await, GuardOutcome::Spinner);
        assert_eq!(app.guard("/city/3").await, GuardOutcome::Render);
    }

    #[tokio::test]
    async fn test_guard_redirects_after_init_without_tokens() {
        let app = app();
        app.init().await;
        assert_eq!(
            app.guard("/settings").await,
            GuardOutcome::Redirect(CONSUMER_LOGIN_PATH)
        );
        assert_eq!(
            app.guard("/business-owner/edit/4").await,
            GuardOutcome::Redirect(OWNER_LOGIN_PATH)
        );
    }

    #[tokio::test]
    async fn test_init_resolves_sign_in_widget() {
        let app = app();
        assert_eq!(app.google.state(), WidgetState::Loading);
        app.init().await;
        assert!(matches!(app.google.state(), WidgetState::Failed(_)));

        let mut config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        config.google_client_id = Some("client-id.apps.googleusercontent.com".to_string());
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();
        app.init().await;
        assert_eq!(app.google.state(), WidgetState::Ready);
    }
}
