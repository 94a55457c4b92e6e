//! BuzzGram client library.
//!
//! Everything the BuzzGram front end does short of rendering:
//!
//! - [`http::ApiClient`] talks to the REST API, unwrapping the
//!   `{ success, data }` envelope and attaching the bearer token of one
//!   session domain.
//! - [`session`] holds the consumer/admin and business-owner identities,
//!   each with its own persisted token.
//! - [`cache::QueryCache`] caches query results and broadcasts invalidations.
//! - [`pages`] are view models for each screen.
//!
//! # Example
//!
//! ```rust,ignore
//! use buzzgram_client::{App, ClientConfig};
//!
//! let app = App::from_config(ClientConfig::from_env()?)?;
//! app.init().await;
//! let cities = app.api.get_cities().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod federated;
pub mod http;
pub mod mutation;
pub mod pages;
pub mod session;
pub mod storage;

pub use app::App;
pub use cache::{Invalidation, QueryCache, QueryKey};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, StorageError};
pub use federated::{FederatedIdentity, GoogleSignIn, NoopFederated, WidgetState};
pub use http::ApiClient;
pub use mutation::Mutation;
pub use session::{ConsumerSession, FederatedProfile, OwnerSession};
pub use storage::{FileStore, LocalStore, MemoryStore};
