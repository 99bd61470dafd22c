//! Repositories orchestrating core logic against the store.

pub mod account;
pub mod journal;
pub mod ledger;

pub use account::AccountRepository;
pub use journal::{EntryFilter, JournalRepository};
pub use ledger::LedgerRepository;
