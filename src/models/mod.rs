mod amount;
mod fixed_entry;
mod profit_goal;
mod record_id;
mod recurring_entry;
mod resource;

pub use amount::format_amount;
pub use fixed_entry::FixedEntry;
pub use profit_goal::ProfitGoal;
pub use record_id::RecordId;
pub use recurring_entry::RecurringEntry;
pub use resource::{FieldKind, FieldSpec, ResourceKind, UpdateMode};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A record as returned by one of the collection endpoints.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> &RecordId;

    /// Column headers for tabular output.
    fn headers() -> &'static [&'static str];

    /// One table row, in `headers()` order.
    fn row(&self) -> Vec<String>;
}
