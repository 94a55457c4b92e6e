//! BuzzGram Core - Shared types and pure logic.
//!
//! This crate provides everything the BuzzGram client needs that does not
//! touch the network or the disk:
//! - wire models of the REST API
//! - the identity capability shared by both session domains
//! - the route guard and the application route table
//! - client-side filtering and grouping used by the pages
//! - form validation with user-facing messages
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, roles and statuses
//! - [`models`] - API payloads (`User`, `Business`, `Approval`, ...)
//! - [`identity`] - Session snapshots and the [`identity::Identity`] trait
//! - [`guard`] - Route access decisions
//! - [`routes`] - Route table and path matching
//! - [`filter`] - City page filter and owner dashboard grouping
//! - [`forms`] - Form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod forms;
pub mod guard;
pub mod identity;
pub mod models;
pub mod routes;
pub mod types;

pub use types::*;
