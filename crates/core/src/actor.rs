//! Acting users and role capabilities.
//!
//! The engine never authenticates anyone; identity arrives as an
//! [`Actor`] value supplied by the caller, and permission checks consume
//! only the role capability predicates defined here.

use serde::{Deserialize, Serialize};
use std::fmt;

use finbook_shared::types::UserId;

/// User role in the organization hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can create and edit their own journal entries.
    Accountant = 0,
    /// Can additionally approve and reject journal entries.
    Manager = 1,
    /// Full access, including other users' pending entries.
    Administrator = 2,
}

impl Role {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "accountant" => Some(Self::Accountant),
            "manager" => Some(Self::Manager),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accountant => "accountant",
            Self::Manager => "manager",
            Self::Administrator => "administrator",
        }
    }

    /// Returns true if this role can approve or reject journal entries.
    #[must_use]
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Manager | Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user performing an engine operation.
///
/// Passed explicitly into every state-changing operation; there is no
/// ambient current-user context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The user's identifier.
    pub id: UserId,
    /// The user's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if this actor can approve or reject journal entries.
    #[must_use]
    pub fn can_approve(&self) -> bool {
        self.role.can_approve()
    }

    /// Returns true if this actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Returns true if this actor may modify an entry created by `creator`.
    ///
    /// Pending entries may be edited or deleted by their creator or by an
    /// administrator.
    #[must_use]
    pub fn can_modify_entry_of(&self, creator: UserId) -> bool {
        self.id == creator || self.is_admin()
    }
}
