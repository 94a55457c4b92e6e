//! Command implementations.
//!
//! Each command drives the same page models and sessions the app uses and
//! prints a plain-text summary.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod owner;

use buzzgram_client::{ClientError, ConfigError};
use buzzgram_core::forms::ValidationError;
use thiserror::Error;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure message as the app would show it.
    #[error("{0}")]
    Client(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not signed in. Run `{0}` first.")]
    NotSignedIn(&'static str),
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        Self::Client(e.user_message(&e.to_string()))
    }
}
