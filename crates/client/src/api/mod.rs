//! Typed endpoint methods, grouped by path family.
//!
//! Each file adds an `impl ApiClient` block. Methods send whatever token the
//! client's slot holds, so call them on the client of the session the
//! endpoint belongs to (`ConsumerSession::api()` or `OwnerSession::api()`).

mod account;
mod admin;
mod catalog;
mod claims;
mod favorites;
mod owner;
mod quotes;

pub use admin::AdminBusinessStatusUpdate;
pub use catalog::HealthStatus;
