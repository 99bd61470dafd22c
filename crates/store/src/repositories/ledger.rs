//! Ledger repository for per-account reads and reconciliation.

use rust_decimal::Decimal;
use std::sync::Arc;

use finbook_core::error::EngineError;
use finbook_core::ledger::{DateRange, LedgerPosting, LedgerView, replay_balance};
use finbook_shared::types::{AccountId, JournalEntryId};

use crate::memory::MemoryStore;

/// Ledger repository for reads over the append-only posting table.
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<MemoryStore>,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Builds the chronological ledger view of one account.
    ///
    /// The view derives running balances fresh on every iteration by
    /// folding postings onto the account's initial balance; see
    /// [`LedgerView`].
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn read_ledger(
        &self,
        account_id: AccountId,
        range: DateRange,
    ) -> Result<LedgerView, EngineError> {
        let tables = self.store.read();
        let account = tables
            .accounts
            .get(&account_id)
            .ok_or(EngineError::AccountNotFound(account_id))?;

        let postings: Vec<_> = tables
            .postings
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect();

        Ok(LedgerView::build(account, postings, range))
    }

    /// Returns the postings created for one journal entry.
    #[must_use]
    pub fn entry_postings(&self, entry_id: JournalEntryId) -> Vec<LedgerPosting> {
        self.store
            .read()
            .postings
            .iter()
            .filter(|p| p.entry_id == entry_id)
            .cloned()
            .collect()
    }

    /// Checks the account's stored balance against a full ledger replay.
    ///
    /// The denormalized balance is authoritative; a mismatch with the
    /// replayed ledger is an integrity fault, never silently trusted.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or
    /// `BalanceDivergence` (with both values) if the stored balance and
    /// the replay disagree.
    pub fn reconcile(&self, account_id: AccountId) -> Result<Decimal, EngineError> {
        let tables = self.store.read();
        let account = tables
            .accounts
            .get(&account_id)
            .ok_or(EngineError::AccountNotFound(account_id))?;

        let derived = replay_balance(
            account.initial_balance,
            account.normal_side,
            tables.postings.iter().filter(|p| p.account_id == account_id),
        );

        if derived == account.balance {
            Ok(account.balance)
        } else {
            tracing::warn!(
                account_id = %account_id,
                stored = %account.balance,
                derived = %derived,
                "ledger does not reconcile"
            );
            Err(EngineError::BalanceDivergence {
                account_id,
                stored: account.balance,
                derived,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finbook_core::account::{Account, AccountCategory, CreateAccountInput, Side};
    use finbook_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn seeded_store() -> (Arc<MemoryStore>, AccountId) {
        let store = Arc::new(MemoryStore::new());
        let account = Account::create(
            CreateAccountInput {
                number: "1010".to_string(),
                name: "Cash".to_string(),
                description: None,
                normal_side: Side::Debit,
                category: AccountCategory::Asset,
                initial_balance: dec!(100.00),
            },
            UserId::new(),
            Utc::now(),
        );
        let account_id = account.id;
        store.write().accounts.insert(account_id, account);
        (store, account_id)
    }

    #[test]
    fn test_reconcile_clean_account() {
        let (store, account_id) = seeded_store();
        let repo = LedgerRepository::new(store);
        assert_eq!(repo.reconcile(account_id).unwrap(), dec!(100.00));
    }

    #[test]
    fn test_reconcile_detects_divergence() {
        let (store, account_id) = seeded_store();

        // Corrupt the stored aggregate behind the poster's back.
        if let Some(account) = store.write().accounts.get_mut(&account_id) {
            account.balance = dec!(250.00);
        }

        let repo = LedgerRepository::new(store);
        match repo.reconcile(account_id) {
            Err(EngineError::BalanceDivergence {
                stored, derived, ..
            }) => {
                assert_eq!(stored, dec!(250.00));
                assert_eq!(derived, dec!(100.00));
            }
            other => panic!("expected BalanceDivergence, got {other:?}"),
        }
    }

    #[test]
    fn test_reconcile_unknown_account() {
        let (store, _) = seeded_store();
        let repo = LedgerRepository::new(store);
        assert!(matches!(
            repo.reconcile(AccountId::new()),
            Err(EngineError::AccountNotFound(_))
        ));
    }
}
