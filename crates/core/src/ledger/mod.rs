//! Ledger postings and running-balance views.
//!
//! This module implements the posting side of the engine:
//! - Append-only ledger postings derived from approved entries
//! - Balance application and replay
//! - Chronological per-account ledger views with a synthetic opening row

pub mod posting;
pub mod view;

pub use posting::{LedgerPosting, post_to_account, postings_for_entry, replay_balance};
pub use view::{DateRange, LedgerRow, LedgerView};
