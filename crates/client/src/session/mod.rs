//! Session stores for the two authentication domains.
//!
//! [`ConsumerSession`] holds the consumer/admin identity and
//! [`OwnerSession`] the business-owner identity. Each owns its own token slot
//! on the HTTP client and its own persisted token key; nothing one does is
//! visible to the other.
//!
//! State sits behind `tokio::sync::RwLock`s that are never held across a
//! request, so a login racing hydration resolves last-write-wins.

mod consumer;
mod owner;

pub use consumer::{ConsumerSession, FederatedProfile};
pub use owner::OwnerSession;

use secrecy::SecretString;

use crate::storage::LocalStore;

/// Persisted token under `key`. Storage failures read as "no token".
fn load_token(store: &dyn LocalStore, key: &str) -> Option<SecretString> {
    match store.get(key) {
        Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
        Err(e) => {
            tracing::warn!(error = %e, key, "Failed to read persisted token");
            None
        }
    }
}

fn persist_token(store: &dyn LocalStore, key: &str, token: &str) {
    if let Err(e) = store.set(key, token) {
        tracing::warn!(error = %e, key, "Failed to persist token");
    }
}

fn discard_token(store: &dyn LocalStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(error = %e, key, "Failed to remove persisted token");
    }
}
