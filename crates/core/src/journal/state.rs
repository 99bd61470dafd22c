//! Journal entry workflow transitions.
//!
//! Stateless transition checks for the Pending -> Approved/Rejected
//! state machine. Each successful check returns an [`EntryAction`]
//! carrying the audit trail data (who, when, why) for the repository
//! to persist.

use chrono::{DateTime, Utc};

use finbook_shared::types::UserId;

use crate::actor::Actor;
use crate::error::EngineError;
use crate::journal::types::{EntryStatus, JournalEntry};

/// A validated workflow transition with its audit trail data.
#[derive(Debug, Clone)]
pub enum EntryAction {
    /// Approve a pending entry.
    Approve {
        /// The approving user.
        approved_by: UserId,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending entry.
    Reject {
        /// The rejecting user.
        rejected_by: UserId,
        /// When the rejection happened.
        rejected_at: DateTime<Utc>,
        /// The reason given.
        reason: String,
    },
}

impl EntryAction {
    /// Returns the status this action transitions the entry to.
    #[must_use]
    pub const fn new_status(&self) -> EntryStatus {
        match self {
            Self::Approve { .. } => EntryStatus::Approved,
            Self::Reject { .. } => EntryStatus::Rejected,
        }
    }

    /// Returns when the action happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { approved_at, .. } => *approved_at,
            Self::Reject { rejected_at, .. } => *rejected_at,
        }
    }

    /// Applies the transition to the entry, recording the deciding
    /// user, the timestamp, and the rejection reason where present.
    pub fn apply(self, entry: &mut JournalEntry) {
        match self {
            Self::Approve {
                approved_by,
                approved_at,
            } => {
                entry.status = EntryStatus::Approved;
                entry.approved_by = Some(approved_by);
                entry.approval_date = Some(approved_at);
            }
            Self::Reject {
                rejected_by,
                rejected_at,
                reason,
            } => {
                entry.status = EntryStatus::Rejected;
                entry.approved_by = Some(rejected_by);
                entry.approval_date = Some(rejected_at);
                entry.rejection_reason = Some(reason);
            }
        }
    }
}

/// Stateless service validating workflow transitions.
pub struct EntryWorkflow;

impl EntryWorkflow {
    /// Validates approval of an entry.
    ///
    /// # Errors
    ///
    /// Returns `NotPending` if the entry is not pending, or
    /// `ApproverRoleRequired` if the actor cannot approve.
    pub fn approve(current: EntryStatus, approver: &Actor) -> Result<EntryAction, EngineError> {
        if current != EntryStatus::Pending {
            return Err(EngineError::NotPending { status: current });
        }
        if !approver.can_approve() {
            return Err(EngineError::ApproverRoleRequired {
                role: approver.role,
            });
        }

        Ok(EntryAction::Approve {
            approved_by: approver.id,
            approved_at: Utc::now(),
        })
    }

    /// Validates rejection of an entry.
    ///
    /// The reason is trimmed and must be at least `min_reason_len`
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns `RejectionReasonTooShort`, `NotPending`, or
    /// `ApproverRoleRequired` on the corresponding violation.
    pub fn reject(
        current: EntryStatus,
        approver: &Actor,
        reason: &str,
        min_reason_len: usize,
    ) -> Result<EntryAction, EngineError> {
        let reason = reason.trim();
        if reason.chars().count() < min_reason_len {
            return Err(EngineError::RejectionReasonTooShort {
                len: reason.chars().count(),
                min: min_reason_len,
            });
        }

        if current != EntryStatus::Pending {
            return Err(EngineError::NotPending { status: current });
        }
        if !approver.can_approve() {
            return Err(EngineError::ApproverRoleRequired {
                role: approver.role,
            });
        }

        Ok(EntryAction::Reject {
            rejected_by: approver.id,
            rejected_at: Utc::now(),
            reason: reason.to_string(),
        })
    }

    /// Validates that an entry may be edited or deleted by `actor`.
    ///
    /// Only pending entries are mutable, and only by their creator or
    /// an administrator.
    ///
    /// # Errors
    ///
    /// Returns `EntryImmutable` for non-pending entries and
    /// `NotEntryOwner` for unauthorized actors.
    pub fn ensure_mutable(
        current: EntryStatus,
        actor: &Actor,
        created_by: UserId,
    ) -> Result<(), EngineError> {
        if !current.is_editable() {
            return Err(EngineError::EntryImmutable { status: current });
        }
        if !actor.can_modify_entry_of(created_by) {
            return Err(EngineError::NotEntryOwner);
        }
        Ok(())
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending -> Approved (approve)
    /// - Pending -> Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (
                EntryStatus::Pending,
                EntryStatus::Approved | EntryStatus::Rejected
            )
        )
    }
}
