//! Generic CRUD controller for one remote collection.
//!
//! A [`ResourceController`] holds the last fetched copy of a collection, the
//! create form's draft, at most one edit session and a single notice slot.
//! Every mutation goes straight to the server; on success the controller marks
//! its copy stale and refetches the whole collection instead of patching it.

use serde_json::Value;
use std::sync::Arc;

use super::cache::{CacheState, RefreshTicket, RefreshTracker};
use super::client::ApiClient;
use super::draft::Draft;
use super::error::{ApiError, SyncError, ValidationError};
use crate::identity::{ConfirmGate, IdentityProvider};
use crate::models::{
    FixedEntry, ProfitGoal, Record, RecordId, RecurringEntry, ResourceKind, UpdateMode,
};

/// The controller's single user-visible message.
///
/// Error and success share one slot, so setting one clears the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(m) | Notice::Success(m) => m,
        }
    }
}

/// An in-progress edit of one existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target: RecordId,
    original: Draft,
    draft: Draft,
}

impl EditSession {
    pub fn target(&self) -> &RecordId {
        &self.target
    }

    /// The record's values when the session opened.
    pub fn original(&self) -> &Draft {
        &self.original
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }
}

#[derive(Debug, Clone, Default)]
enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Local state and mutations for one resource kind.
pub struct ResourceController<R: Record> {
    kind: ResourceKind,
    client: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    items: Vec<R>,
    cache: RefreshTracker,
    edit: EditState,
    new_draft: Draft,
    notice: Option<Notice>,
}

impl ResourceController<FixedEntry> {
    pub fn fixed_income(client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(ResourceKind::FixedIncome, client, identity)
    }

    pub fn fixed_expenses(client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(ResourceKind::FixedExpenses, client, identity)
    }
}

impl ResourceController<RecurringEntry> {
    pub fn recurring_income(client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(ResourceKind::RecurringIncome, client, identity)
    }

    pub fn recurring_expenses(client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(ResourceKind::RecurringExpenses, client, identity)
    }
}

impl ResourceController<ProfitGoal> {
    pub fn profit_goals(client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(ResourceKind::ProfitGoals, client, identity)
    }
}

impl<R: Record> ResourceController<R> {
    /// Creates an empty, stale controller. Nothing is fetched until
    /// [`load`](Self::load) is called.
    ///
    /// `kind` must be a resource whose records deserialize as `R`; the typed
    /// constructors above pair them up.
    pub fn new(kind: ResourceKind, client: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            kind,
            client,
            identity,
            items: Vec::new(),
            cache: RefreshTracker::default(),
            edit: EditState::Idle,
            new_draft: Draft::empty(kind),
            notice: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Records in server order, as last fetched.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: &RecordId) -> Option<&R> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.notice {
            Some(Notice::Error(m)) => Some(m),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        match &self.notice {
            Some(Notice::Success(m)) => Some(m),
            _ => None,
        }
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        match &self.edit {
            EditState::Editing(session) => Some(session),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing(_))
    }

    pub fn new_draft(&self) -> &Draft {
        &self.new_draft
    }

    // ---- loading ----

    /// Fetches the whole collection and replaces `items`.
    ///
    /// On failure the previous items are kept and an error notice is set.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let ticket = self.begin_refresh();
        let result = self.client.list::<R>(self.kind).await;
        self.apply_refresh(ticket, result).map(|_| ())
    }

    /// Takes a ticket for a refetch about to be issued.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        let ticket = self.cache.begin();
        tracing::debug!("Refreshing {} (ticket {})", self.kind.label(), ticket.seq());
        ticket
    }

    /// Applies the outcome of the refetch identified by `ticket`.
    ///
    /// Returns `Ok(false)` when a newer response has already been applied and
    /// this one was discarded.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<R>, ApiError>,
    ) -> Result<bool, SyncError> {
        if !self.cache.accepts(ticket) {
            tracing::debug!(
                "Discarding {} response for ticket {}, already applied {}",
                self.kind.label(),
                ticket.seq(),
                self.cache.applied_seq()
            );
            return Ok(false);
        }

        match result {
            Ok(items) => {
                self.items = items;
                self.cache.complete(ticket);
                Ok(true)
            }
            Err(e) => {
                self.cache.fail(ticket);
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Failed to fetch {}", self.kind.label()));
                tracing::warn!("Loading {} failed: {}", self.kind.label(), e);
                self.notice = Some(Notice::Error(message.clone()));
                Err(SyncError::Fetch(message))
            }
        }
    }

    // ---- create ----

    /// Resets the create form to its defaults, then applies `values`.
    pub fn begin_create(&mut self, values: &[(&str, &str)]) -> Result<(), SyncError> {
        let mut draft = Draft::empty(self.kind);
        for (field, value) in values {
            draft.set(field, *value)?;
        }
        self.new_draft = draft;
        Ok(())
    }

    pub fn update_draft(&mut self, field: &str, value: impl Into<String>) -> Result<(), SyncError> {
        self.new_draft.set(field, value)?;
        Ok(())
    }

    /// Sends the create form to the server.
    ///
    /// The draft is reset only when the server accepts it.
    pub async fn submit_create(&mut self) -> Result<(), SyncError> {
        self.authorize()?;
        self.check(self.new_draft.validate())?;

        let mut payload = self.new_draft.create_payload();
        if let (Some(key), Some(user_id)) = (self.kind.owner_key(), self.identity.user_id()) {
            payload.insert(key.to_string(), Value::String(user_id.to_string()));
        }

        match self.client.create(self.kind, &payload).await {
            Ok(body) => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} created successfully!", self.title()));
                tracing::info!("Created {}", self.kind.singular());
                self.new_draft = Draft::empty(self.kind);
                self.refresh_after_mutation(message).await
            }
            Err(e) => Err(self.mutation_failed("create", e)),
        }
    }

    // ---- edit ----

    /// Opens an edit session on `record`, discarding any other session.
    pub fn begin_edit(&mut self, record: &R) -> Result<(), SyncError> {
        self.authorize()?;
        let draft = Draft::from_record(self.kind, record)
            .map_err(|e| SyncError::InvalidRecord(e.to_string()))?;

        if let Some(previous) = self.edit_session() {
            if previous.target() != record.id() {
                tracing::debug!("Discarding edit of {} {}", self.kind.singular(), previous.target());
            }
        }
        self.edit = EditState::Editing(EditSession {
            target: record.id().clone(),
            original: draft.clone(),
            draft,
        });
        Ok(())
    }

    /// Opens an edit session on the loaded record with `id`.
    pub fn begin_edit_by_id(&mut self, id: &RecordId) -> Result<(), SyncError> {
        let record = self.find(id).cloned().ok_or_else(|| SyncError::UnknownRecord {
            kind: self.kind.singular(),
            id: id.to_string(),
        })?;
        self.begin_edit(&record)
    }

    pub fn update_edit_draft(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), SyncError> {
        match &mut self.edit {
            EditState::Editing(session) => {
                session.draft.set(field, value)?;
                Ok(())
            }
            EditState::Idle => Err(SyncError::NoEditSession),
        }
    }

    /// Writes the open session back to the server.
    ///
    /// The session closes only on success; a rejected update can be retried.
    pub async fn submit_update(&mut self) -> Result<(), SyncError> {
        let session = match &self.edit {
            EditState::Editing(session) => session.clone(),
            EditState::Idle => return Err(SyncError::NoEditSession),
        };
        self.authorize()?;

        let result = match self.kind.update_mode() {
            UpdateMode::FullReplace => {
                self.check(session.draft.validate())?;
                let payload = session.draft.replace_payload();
                self.client.replace(self.kind, &session.target, &payload).await
            }
            UpdateMode::Partial => {
                let payload = session.draft.diff(&session.original);
                if payload.is_empty() {
                    return Err(self.reject(ValidationError::NoChanges));
                }
                self.client.patch(self.kind, &session.target, &payload).await
            }
        };

        match result {
            Ok(_) => {
                tracing::info!("Updated {} {}", self.kind.singular(), session.target);
                self.edit = EditState::Idle;
                let message = format!("{} updated successfully!", self.title());
                self.refresh_after_mutation(message).await
            }
            Err(e) => Err(self.mutation_failed("update", e)),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    // ---- delete ----

    /// Deletes the record with `id` once `gate` confirms.
    ///
    /// Returns `Ok(false)` without sending anything when the gate declines.
    pub async fn remove(&mut self, id: &RecordId, gate: &dyn ConfirmGate) -> Result<bool, SyncError> {
        self.authorize()?;

        let prompt = format!("Are you sure you want to delete this {}?", self.kind.singular());
        if !gate.confirm(&prompt) {
            tracing::debug!("Delete of {} {} declined", self.kind.singular(), id);
            return Ok(false);
        }

        match self.client.delete(self.kind, id).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", self.kind.singular(), id);
                if self.edit_session().is_some_and(|s| s.target() == id) {
                    self.edit = EditState::Idle;
                }
                let message = format!("{} deleted successfully!", self.title());
                self.refresh_after_mutation(message).await?;
                Ok(true)
            }
            Err(e) => Err(self.mutation_failed("delete", e)),
        }
    }

    // ---- helpers ----

    async fn refresh_after_mutation(&mut self, message: String) -> Result<(), SyncError> {
        self.notice = Some(Notice::Success(message));
        self.cache.invalidate();
        self.load().await
    }

    fn authorize(&mut self) -> Result<(), SyncError> {
        let Some(privilege) = self.kind.required_privilege() else {
            return Ok(());
        };
        if self.identity.has_privilege(privilege) {
            return Ok(());
        }
        let message = format!("Unauthorized: Only Super Admins can {}.", privilege);
        tracing::warn!("{}", message);
        self.notice = Some(Notice::Error(message.clone()));
        Err(SyncError::Authorization(message))
    }

    fn check(&mut self, result: Result<(), ValidationError>) -> Result<(), SyncError> {
        result.map_err(|e| self.reject(e))
    }

    fn reject(&mut self, error: ValidationError) -> SyncError {
        self.notice = Some(Notice::Error(error.to_string()));
        SyncError::Validation(error)
    }

    fn mutation_failed(&mut self, action: &str, error: ApiError) -> SyncError {
        tracing::warn!("Failed to {} {}: {}", action, self.kind.singular(), error);
        let message = error
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to {} {}", action, self.kind.singular()));
        self.notice = Some(Notice::Error(message.clone()));
        SyncError::Mutation(message)
    }

    /// Singular label with a leading capital, for success messages.
    fn title(&self) -> String {
        let singular = self.kind.singular();
        let mut chars = singular.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
