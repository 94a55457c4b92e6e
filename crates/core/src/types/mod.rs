//! Core value types for BuzzGram.
//!
//! Type-safe IDs, the email address type, and the role/status enums the API
//! exchanges as snake_case strings.

pub mod email;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
