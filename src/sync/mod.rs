//! Synchronization between local controllers and the FinSync REST API.
//!
//! The server is the only source of truth. A [`ResourceController`] keeps an
//! in-memory copy of one collection and refetches it after every successful
//! mutation, so the local list is never patched in place.
//!
//! # Layout
//!
//! - [`ApiClient`]: typed wrapper over the five REST collections
//! - [`ResourceController`]: list, create form, edit session and notice for
//!   one collection
//! - [`Draft`]: raw form input and the payloads built from it
//! - [`RefreshTicket`] / [`CacheState`]: refetch sequencing
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use finsync::identity::RoleIdentity;
//! use finsync::sync::{ApiClient, ResourceController};
//!
//! # async fn run() -> Result<(), finsync::sync::SyncError> {
//! let client = ApiClient::new("http://localhost:5000", None);
//! let identity = Arc::new(RoleIdentity::new(Some("1".into()), None, "superAdmin"));
//! let mut expenses = ResourceController::fixed_expenses(client, identity);
//! expenses.load().await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod controller;
pub mod draft;
pub mod error;

#[cfg(test)]
pub(crate) mod mock_api;

pub use cache::{CacheState, RefreshTicket, RefreshTracker};
pub use client::{ApiClient, CredentialPolicy};
pub use controller::{EditSession, Notice, ResourceController};
pub use draft::{normalize_date, Draft};
pub use error::{ApiError, SyncError, ValidationError};
