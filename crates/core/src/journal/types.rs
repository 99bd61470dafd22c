//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use finbook_shared::types::{AccountId, AttachmentId, JournalEntryId, JournalLineId, UserId};

use crate::account::Side;

/// Journal entry status in the approval workflow.
///
/// Entries start Pending and transition exactly once to Approved or
/// Rejected; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Awaiting approval; the only editable state.
    Pending,
    /// Approved and posted to the ledger (immutable).
    Approved,
    /// Rejected with a reason (immutable).
    Rejected,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the entry can still be modified or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line in a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub entry_id: JournalEntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub side: Side,
    /// Line amount (strictly positive).
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl JournalLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => -self.amount,
        }
    }
}

/// Input for a single line when creating or editing an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub side: Side,
    /// Line amount (must be strictly positive).
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryInput {
    /// The business date of the entry.
    pub entry_date: NaiveDate,
    /// Description of the entry.
    pub description: String,
    /// Whether this is an adjusting entry.
    pub is_adjusting: bool,
    /// The entry lines (at least one debit and one credit).
    pub lines: Vec<LineInput>,
}

/// Partial update to a pending journal entry.
///
/// A `lines` patch replaces the whole line set after re-validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New entry date.
    pub entry_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New adjusting flag.
    pub is_adjusting: Option<bool>,
    /// Replacement line set.
    pub lines: Option<Vec<LineInput>>,
}

/// A journal entry with its owned, ordered lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// The business date of the entry.
    pub entry_date: NaiveDate,
    /// Description of the entry.
    pub description: String,
    /// Current workflow status.
    pub status: EntryStatus,
    /// Whether this is an adjusting entry.
    pub is_adjusting: bool,
    /// The user who created the entry.
    pub created_by: UserId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// The user who approved or rejected the entry, once decided.
    pub approved_by: Option<UserId>,
    /// When the entry was approved or rejected.
    pub approval_date: Option<DateTime<Utc>>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// The entry lines.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Creates a new pending entry from validated input.
    #[must_use]
    pub fn create(input: CreateEntryInput, created_by: UserId, now: DateTime<Utc>) -> Self {
        let id = JournalEntryId::new();
        let lines = Self::lines_from_inputs(id, &input.lines);
        Self {
            id,
            entry_date: input.entry_date,
            description: input.description,
            status: EntryStatus::Pending,
            is_adjusting: input.is_adjusting,
            created_by,
            created_at: now,
            approved_by: None,
            approval_date: None,
            rejection_reason: None,
            lines,
        }
    }

    /// Replaces the whole line set (used when editing a pending entry).
    pub fn replace_lines(&mut self, inputs: &[LineInput]) {
        self.lines = Self::lines_from_inputs(self.id, inputs);
    }

    fn lines_from_inputs(entry_id: JournalEntryId, inputs: &[LineInput]) -> Vec<JournalLine> {
        inputs
            .iter()
            .map(|input| JournalLine {
                id: JournalLineId::new(),
                entry_id,
                account_id: input.account_id,
                side: input.side,
                amount: input.amount,
            })
            .collect()
    }

    /// Sum of the debit lines.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.side == Side::Debit)
            .map(|l| l.amount)
            .sum()
    }

    /// Sum of the credit lines.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.side == Side::Credit)
            .map(|l| l.amount)
            .sum()
    }

    /// The entry's total amount (the debit total, which equals the
    /// credit total for a balanced entry).
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.total_debits()
    }

    /// Returns true if the entry can still be modified or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }
}

/// Metadata for a file attached to a journal entry.
///
/// File content storage is a separate collaborator; the engine only
/// tracks the metadata and cascades it with the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Unique identifier.
    pub id: AttachmentId,
    /// The entry this attachment belongs to.
    pub entry_id: JournalEntryId,
    /// Original file name.
    pub file_name: String,
    /// Storage path of the file content.
    pub file_path: String,
    /// MIME type, if known.
    pub file_type: Option<String>,
    /// File size in bytes, if known.
    pub file_size: Option<u64>,
    /// The user who uploaded the file.
    pub uploaded_by: UserId,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// Input for attaching a file to a pending entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentInput {
    /// Original file name.
    pub file_name: String,
    /// Storage path of the file content.
    pub file_path: String,
    /// MIME type, if known.
    pub file_type: Option<String>,
    /// File size in bytes, if known.
    pub file_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> CreateEntryInput {
        CreateEntryInput {
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            description: "Office supplies".to_string(),
            is_adjusting: false,
            lines: vec![
                LineInput {
                    account_id: AccountId::new(),
                    side: Side::Debit,
                    amount: dec!(120.00),
                },
                LineInput {
                    account_id: AccountId::new(),
                    side: Side::Credit,
                    amount: dec!(120.00),
                },
            ],
        }
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(EntryStatus::parse("pending"), Some(EntryStatus::Pending));
        assert_eq!(EntryStatus::parse("APPROVED"), Some(EntryStatus::Approved));
        assert_eq!(EntryStatus::parse("Rejected"), Some(EntryStatus::Rejected));
        assert_eq!(EntryStatus::parse("draft"), None);
        assert_eq!(EntryStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_status_editable_and_terminal() {
        assert!(EntryStatus::Pending.is_editable());
        assert!(!EntryStatus::Approved.is_editable());
        assert!(!EntryStatus::Rejected.is_editable());
        assert!(!EntryStatus::Pending.is_terminal());
        assert!(EntryStatus::Approved.is_terminal());
        assert!(EntryStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_create_starts_pending_with_lines() {
        let creator = UserId::new();
        let entry = JournalEntry::create(sample_input(), creator, Utc::now());

        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.created_by, creator);
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.lines.iter().all(|l| l.entry_id == entry.id));
        assert!(entry.approved_by.is_none());
        assert!(entry.rejection_reason.is_none());
    }

    #[test]
    fn test_totals() {
        let entry = JournalEntry::create(sample_input(), UserId::new(), Utc::now());
        assert_eq!(entry.total_debits(), dec!(120.00));
        assert_eq!(entry.total_credits(), dec!(120.00));
        assert_eq!(entry.total_amount(), dec!(120.00));
    }

    #[test]
    fn test_signed_amount() {
        let entry = JournalEntry::create(sample_input(), UserId::new(), Utc::now());
        assert_eq!(entry.lines[0].signed_amount(), dec!(120.00));
        assert_eq!(entry.lines[1].signed_amount(), dec!(-120.00));
    }

    #[test]
    fn test_replace_lines_reassigns_ids_and_parent() {
        let mut entry = JournalEntry::create(sample_input(), UserId::new(), Utc::now());
        let old_ids: Vec<_> = entry.lines.iter().map(|l| l.id).collect();

        entry.replace_lines(&[
            LineInput {
                account_id: AccountId::new(),
                side: Side::Debit,
                amount: dec!(75.00),
            },
            LineInput {
                account_id: AccountId::new(),
                side: Side::Credit,
                amount: dec!(75.00),
            },
        ]);

        assert_eq!(entry.lines.len(), 2);
        assert!(entry.lines.iter().all(|l| l.entry_id == entry.id));
        assert!(entry.lines.iter().all(|l| !old_ids.contains(&l.id)));
        assert_eq!(entry.total_debits(), dec!(75.00));
    }
}
