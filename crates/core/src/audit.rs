//! Audit events and outbound collaborator traits.
//!
//! The engine emits structured audit events for every state change and a
//! notification when a pending entry is submitted. Delivery and storage
//! belong to the collaborators behind [`AuditSink`] and [`Notifier`];
//! the in-memory implementations here back tests and single-process use.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use finbook_shared::types::{JournalEntryId, UserId};

/// The kind of change an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
    /// A journal entry was approved.
    Approve,
    /// A journal entry was rejected.
    Reject,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
        }
    }
}

/// A structured audit event describing one state change.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// The user who performed the action.
    pub actor: UserId,
    /// The kind of change.
    pub action: AuditAction,
    /// The logical table the changed record lives in.
    pub table_name: &'static str,
    /// The changed record's identifier, rendered as a string.
    pub record_id: String,
    /// Snapshot of the record before the change, if any.
    pub before: Option<serde_json::Value>,
    /// Snapshot of the record after the change, if any.
    pub after: Option<serde_json::Value>,
    /// When the change occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Outbound audit collaborator.
///
/// Delivery and storage of events are the sink's responsibility; the
/// engine only emits. Implementations must not panic.
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: AuditEvent);
}

/// Audit sink that buffers events in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Notification payload for a newly submitted pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEntryNotice {
    /// The submitted entry.
    pub entry_id: JournalEntryId,
    /// The user who submitted it.
    pub submitted_by: UserId,
    /// The entry's total amount (the balanced debit/credit total).
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
}

/// Outbound notification collaborator alerting approvers of new
/// pending entries.
///
/// Implementations must swallow their own delivery failures: a
/// notification can never fail or roll back the submission that
/// produced it.
pub trait Notifier: Send + Sync {
    /// Announces a newly submitted pending entry.
    fn entry_submitted(&self, notice: &PendingEntryNotice);
}

/// Notifier that buffers notices in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    notices: Mutex<Vec<PendingEntryNotice>>,
}

impl InMemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all received notices, in emission order.
    #[must_use]
    pub fn notices(&self) -> Vec<PendingEntryNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for InMemoryNotifier {
    fn entry_submitted(&self, notice: &PendingEntryNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
