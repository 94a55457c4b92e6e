//! Federated (Google) sign-in.
//!
//! The identity provider hands the client an opaque credential which the
//! consumer session exchanges at `POST /auth/google`. This module only keeps
//! the provider-side state: whether the widget is usable and whether it may
//! auto-select an account.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Provider hooks the consumer session calls.
pub trait FederatedIdentity: Send + Sync {
    /// Stop the provider from silently re-selecting the last account.
    fn disable_auto_select(&self);
}

/// Lifecycle of the sign-in widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// Provider script not yet initialized.
    Loading,
    /// Button can be used.
    Ready,
    /// Initialization failed; the button stays disabled.
    Failed(String),
}

type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Google Identity Services sign-in.
pub struct GoogleSignIn {
    client_id: Option<String>,
    state: Mutex<WidgetState>,
    auto_select: AtomicBool,
    on_error: Option<ErrorCallback>,
}

impl std::fmt::Debug for GoogleSignIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSignIn")
            .field("client_id", &self.client_id)
            .field("state", &self.state())
            .field("auto_select", &self.auto_select_enabled())
            .finish_non_exhaustive()
    }
}

impl GoogleSignIn {
    /// Label shown while the widget is loading.
    pub const LOADING_LABEL: &'static str = "Loading Sign-In...";
    /// Label of a usable button.
    pub const READY_LABEL: &'static str = "Continue with Google";
    /// Label when the widget could not be initialized.
    pub const FAILED_LABEL: &'static str = "Google Sign-In unavailable";
    /// Message when a credential exchange fails without a server message.
    pub const AUTH_FAILED: &'static str = "Google authentication failed";

    #[must_use]
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client_id,
            state: Mutex::new(WidgetState::Loading),
            auto_select: AtomicBool::new(false),
            on_error: None,
        }
    }

    /// Deliver failures to `callback` instead of the log.
    #[must_use]
    pub fn with_error_callback(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> WidgetState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolve the loading state. Without a client ID the widget fails.
    pub fn initialize(&self) -> WidgetState {
        if self.client_id.is_none() {
            self.fail("Google client ID is not configured");
        } else {
            self.set_state(WidgetState::Ready);
        }
        self.state()
    }

    /// Mark the widget unusable and report `reason`.
    pub fn fail(&self, reason: &str) {
        self.set_state(WidgetState::Failed(reason.to_string()));
        self.report_error(reason);
    }

    /// Route an error to the callback, or log it.
    pub fn report_error(&self, message: &str) {
        match &self.on_error {
            Some(callback) => callback(message),
            None => tracing::warn!(error = %message, "Google sign-in error"),
        }
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        match self.state() {
            WidgetState::Loading => Self::LOADING_LABEL,
            WidgetState::Ready => Self::READY_LABEL,
            WidgetState::Failed(_) => Self::FAILED_LABEL,
        }
    }

    /// Allow the provider to auto-select again (e.g. after an explicit login).
    pub fn enable_auto_select(&self) {
        self.auto_select.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn auto_select_enabled(&self) -> bool {
        self.auto_select.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: WidgetState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl FederatedIdentity for GoogleSignIn {
    fn disable_auto_select(&self) {
        self.auto_select.store(false, Ordering::SeqCst);
    }
}

/// Provider for contexts without a sign-in widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFederated;

impl FederatedIdentity for NoopFederated {
    fn disable_auto_select(&self) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_label_follows_state() {
        let google = GoogleSignIn::new(Some("client-id.apps.googleusercontent.com".to_string()));
        assert_eq!(google.button_label(), "Loading Sign-In...");
        assert_eq!(google.initialize(), WidgetState::Ready);
        assert_eq!(google.button_label(), GoogleSignIn::READY_LABEL);
    }

    #[test]
    fn test_missing_client_id_fails_through_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let google = GoogleSignIn::new(None).with_error_callback(move |msg| {
            sink.lock().unwrap_or_else(PoisonError::into_inner).push(msg.to_string());
        });

        assert!(matches!(google.initialize(), WidgetState::Failed(_)));
        assert_eq!(google.button_label(), GoogleSignIn::FAILED_LABEL);
        let seen = seen.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(*seen, vec!["Google client ID is not configured".to_string()]);
    }

    #[test]
    fn test_disable_auto_select() {
        let google = GoogleSignIn::new(Some("id".to_string()));
        google.enable_auto_select();
        assert!(google.auto_select_enabled());
        google.disable_auto_select();
        assert!(!google.auto_select_enabled());
    }
}
