//! BuzzGram REST API client.
//!
//! Every response body is an envelope `{ success, data, message? }`. The
//! client unwraps `data` on success and turns everything else into a
//! [`ClientError`], logging the failure before returning it unchanged. There
//! is no retry and no backoff.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Response envelope used by every endpoint except `/health`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// Error body; only the message is of interest.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the BuzzGram API.
///
/// Cheap to clone. Clones share the connection pool *and* the token slot;
/// use [`ApiClient::scoped`] for a client with its own token slot, so each
/// session domain sends only its own bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Arc<RwLock<Option<SecretString>>>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// API root without trailing slash, e.g. `http://localhost:3001/api`
    base: String,
}

impl ApiClient {
    /// Create a client without a token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base: config.api_base.as_str().trim_end_matches('/').to_string(),
            }),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// A client sharing this one's connection pool with an empty, independent
    /// token slot.
    #[must_use]
    pub fn scoped(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base
    }

    // =========================================================================
    // Token slot
    // =========================================================================

    /// Attach `Authorization: Bearer <token>` to subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.token.write().await = Some(token);
    }

    /// Get the current token (if set).
    pub async fn token(&self) -> Option<SecretString> {
        self.token.read().await.clone()
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Stop sending the authorization header.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// `GET` and unwrap `data`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure, a non-2xx status, or a
    /// body that is not a successful envelope of `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(self.request(Method::GET, path)).await?;
        unwrap_data(&body)
    }

    /// `GET` with query parameters and unwrap `data`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body = self.send(self.request(Method::GET, path).query(query)).await?;
        unwrap_data(&body)
    }

    /// `GET` a body that is not wrapped in an envelope.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure, a non-2xx status, or an
    /// unparseable body.
    pub async fn get_raw<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(self.request(Method::GET, path)).await?;
        parse_body(&body)
    }

    /// `POST` a JSON body and unwrap `data`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.send(self.request(Method::POST, path).json(body)).await?;
        unwrap_data(&body)
    }

    /// `PUT` a JSON body and unwrap `data`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.send(self.request(Method::PUT, path).json(body)).await?;
        unwrap_data(&body)
    }

    /// Send a request whose response carries no data of interest.
    ///
    /// A JSON body is attached when `body` is `Some`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure, a non-2xx status, or an
    /// envelope with `success: false`.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        let body = self.send(request).await?;
        check_success(&body)
    }

    /// `DELETE` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute::<()>(Method::DELETE, path, None).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base);
        self.inner.client.request(method, url)
    }

    /// Attach the token, send, and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let request = match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "BuzzGram API request failed");
            ClientError::Http(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await.map_err(|e| {
            tracing::error!(
                error = %e,
                status = %status,
                path = %url,
                "Failed to read BuzzGram API response"
            );
            ClientError::Http(e)
        })?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %url,
                body = %text.chars().take(500).collect::<String>(),
                "BuzzGram API returned non-success status"
            );
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message);
            return Err(ClientError::Api { status, message });
        }

        debug!(status = %status, path = %url, "BuzzGram API response");
        Ok(text)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse BuzzGram API response"
        );
        ClientError::Parse(e)
    })
}

/// Unwrap `data` from a 2xx envelope.
fn unwrap_data<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let envelope: Envelope<T> = parse_body(body)?;
    if envelope.success == Some(false) {
        tracing::error!(message = ?envelope.message, "BuzzGram API reported failure");
        return Err(ClientError::Envelope {
            message: envelope.message,
        });
    }
    envelope.data.ok_or(ClientError::Envelope {
        message: envelope.message,
    })
}

/// Accept any 2xx envelope that does not report `success: false`.
fn check_success(body: &str) -> Result<(), ClientError> {
    if body.trim().is_empty() {
        return Ok(());
    }
    let envelope: Envelope<serde_json::Value> = parse_body(body)?;
    if envelope.success == Some(false) {
        tracing::error!(message = ?envelope.message, "BuzzGram API reported failure");
        return Err(ClientError::Envelope {
            message: envelope.message,
        });
    }
    Ok(())
}
