//! FinSync client library.
//!
//! Typed access to the FinSync income, expense and profit-goal API, and the
//! [`ResourceController`](sync::ResourceController) that keeps a local copy of
//! each collection in step with the server.

pub mod config;
pub mod identity;
pub mod models;
pub mod summary;
pub mod sync;

pub use config::{Config, ConfigError};
pub use identity::{ConfirmGate, IdentityProvider, Privilege, RoleIdentity};
pub use models::{FixedEntry, ProfitGoal, Record, RecordId, RecurringEntry, ResourceKind};
pub use summary::{fetch_summary, fetch_summary_with, ExpenseScope, FinanceSummary};
pub use sync::{ApiClient, Notice, ResourceController, SyncError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
