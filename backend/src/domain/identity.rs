//! Authenticated caller identity.

use crate::domain::user::{Role, UserId};

/// Proof of who is calling, produced by token verification.
///
/// An `Identity` only exists after the bearer token has been checked and
/// the referenced account confirmed to still exist; handlers and services
/// can trust it without re-verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
}

impl Identity {
    /// Construct an identity for a verified account.
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Identifier of the authenticated account.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Capability level of the authenticated account.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds operator capabilities.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
