//! Journal entries and their lifecycle.
//!
//! This module implements the journal side of the engine:
//! - Entry and line aggregates
//! - Balance validation for candidate line sets
//! - The Pending -> Approved/Rejected workflow

pub mod state;
pub mod types;
pub mod validation;

pub use state::{EntryAction, EntryWorkflow};
pub use types::{
    AttachmentInput, AttachmentMeta, CreateEntryInput, EntryPatch, EntryStatus, JournalEntry,
    JournalLine, LineInput,
};
pub use validation::{AccountRef, EntryTotals, validate_lines};
