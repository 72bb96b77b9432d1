//! Caller identity and interactive confirmation.
//!
//! Controllers never read global auth state. They ask an injected
//! [`IdentityProvider`] whether the caller holds a [`Privilege`], and ask a
//! [`ConfirmGate`] before destroying anything.

use std::fmt;

/// Capabilities that gate mutations on privileged resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Create, edit and delete profit goals.
    ManageProfitGoals,
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::ManageProfitGoals => write!(f, "manage profit goals"),
        }
    }
}

/// Who is calling, and what they may do.
///
/// This is a UI-side check only; the server enforces the same rules.
pub trait IdentityProvider: Send + Sync {
    /// Id of the signed-in user, if any.
    fn user_id(&self) -> Option<&str>;

    fn has_privilege(&self, privilege: Privilege) -> bool;
}

/// Identity backed by a user id and a role string.
///
/// Every privilege is granted to callers whose role equals `privileged_role`.
#[derive(Debug, Clone, Default)]
pub struct RoleIdentity {
    user_id: Option<String>,
    role: Option<String>,
    privileged_role: String,
}

impl RoleIdentity {
    pub fn new(
        user_id: Option<String>,
        role: Option<String>,
        privileged_role: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            privileged_role: privileged_role.into(),
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl IdentityProvider for RoleIdentity {
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn has_privilege(&self, _privilege: Privilege) -> bool {
        !self.privileged_role.is_empty() && self.role.as_deref() == Some(&self.privileged_role)
    }
}

/// Yes/no prompt consulted before a delete is sent.
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
