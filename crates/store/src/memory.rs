//! The in-memory transactional store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use finbook_core::account::Account;
use finbook_core::journal::{AttachmentMeta, JournalEntry};
use finbook_core::ledger::LedgerPosting;
use finbook_shared::types::{AccountId, AttachmentId, JournalEntryId};

/// The store's table set.
///
/// Journal entries own their lines; attachments and postings reference
/// entries and accounts by id. Postings are append-only.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) entries: HashMap<JournalEntryId, JournalEntry>,
    pub(crate) attachments: HashMap<AttachmentId, AttachmentMeta>,
    pub(crate) postings: Vec<LedgerPosting>,
}

/// Single-process transactional store shared by all repositories.
///
/// One `RwLock` guards the whole table set: a write guard spans an
/// entire repository operation, which gives the conditional-update
/// discipline the workflow needs (a transition re-checks the entry's
/// status under the lock, so concurrent approvers cannot both succeed,
/// and balance read-modify-writes cannot lose updates).
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the read guard, recovering from lock poisoning.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the write guard, recovering from lock poisoning.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        let tables = store.read();
        assert!(tables.accounts.is_empty());
        assert!(tables.entries.is_empty());
        assert!(tables.attachments.is_empty());
        assert!(tables.postings.is_empty());
    }
}
