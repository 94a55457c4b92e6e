//! Integration tests for the BuzzGram client.
//!
//! Every test starts a [`MockServer`] standing in for the BuzzGram API and
//! builds an [`App`] pointed at it, with an in-memory store that the test can
//! seed and inspect.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p buzzgram-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `sessions` - Hydration, login/logout and the two token domains
//! - `pages` - Page models: caching, invalidation and error messages

use std::sync::Arc;

use buzzgram_client::{App, ClientConfig, MemoryStore};
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

/// A mock API and an app wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub app: App,
}

impl TestContext {
    /// Context with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the app cannot be built.
    pub async fn new() -> Self {
        Self::with_store(MemoryStore::new()).await
    }

    /// Context over a pre-seeded store, e.g. with persisted tokens.
    ///
    /// # Panics
    ///
    /// Panics if the app cannot be built.
    #[allow(clippy::unwrap_used)]
    pub async fn with_store(store: MemoryStore) -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::for_origin(&server.uri()).unwrap();
        let store = Arc::new(store);
        let app = App::new(config, Arc::clone(&store) as _).unwrap();
        Self { server, store, app }
    }
}

/// `200 { success: true, data }`.
#[must_use]
pub fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// `200 { success: true }` with no data.
#[must_use]
pub fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

/// Error response carrying a server message.
#[must_use]
pub fn failure(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "success": false, "message": message }))
}

#[must_use]
pub fn user_json(id: i32, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("user{id}@example.com"),
        "name": format!("User {id}"),
        "role": role,
    })
}

#[must_use]
pub fn owner_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": "sam@shop.com",
        "firstName": "Sam",
        "lastName": "Rivera",
    })
}

#[must_use]
pub fn business_json(id: i32, name: &str, city_id: i32, category_id: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "cityId": city_id,
        "categoryId": category_id,
        "description": format!("{name} serves the neighborhood"),
        "instagramHandle": format!("@{}", name.to_lowercase().replace(' ', "_")),
    })
}
