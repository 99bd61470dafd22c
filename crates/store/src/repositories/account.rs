//! Account repository for chart of accounts operations.

use chrono::Utc;
use std::sync::Arc;

use finbook_core::account::{Account, AccountPatch, CreateAccountInput};
use finbook_core::actor::Actor;
use finbook_core::audit::{AuditAction, AuditEvent, AuditSink};
use finbook_core::error::EngineError;
use finbook_shared::types::AccountId;

use crate::memory::MemoryStore;

/// Account repository for registry CRUD.
///
/// Registry writes never touch the running balance; that is the ledger
/// poster's job on the approval path.
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<MemoryStore>,
    audit: Arc<dyn AuditSink>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccountNumber` or `DuplicateAccountName` if
    /// another account already uses the number or name.
    pub fn create(
        &self,
        input: CreateAccountInput,
        actor: &Actor,
    ) -> Result<Account, EngineError> {
        let account = {
            let mut tables = self.store.write();
            if tables.accounts.values().any(|a| a.number == input.number) {
                return Err(EngineError::DuplicateAccountNumber(input.number));
            }
            if tables.accounts.values().any(|a| a.name == input.name) {
                return Err(EngineError::DuplicateAccountName(input.name));
            }

            let account = Account::create(input, actor.id, Utc::now());
            tables.accounts.insert(account.id, account.clone());
            account
        };

        tracing::info!(account_id = %account.id, number = %account.number, "account created");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Create,
            table_name: "accounts",
            record_id: account.id.to_string(),
            before: None,
            after: serde_json::to_value(&account).ok(),
            occurred_at: Utc::now(),
        });

        Ok(account)
    }

    /// Updates an account's registry fields.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or a
    /// duplicate error if the new number or name collides.
    pub fn update(
        &self,
        account_id: AccountId,
        patch: AccountPatch,
        actor: &Actor,
    ) -> Result<Account, EngineError> {
        let (before, updated) = {
            let mut tables = self.store.write();
            if !tables.accounts.contains_key(&account_id) {
                return Err(EngineError::AccountNotFound(account_id));
            }
            if let Some(number) = &patch.number
                && tables
                    .accounts
                    .values()
                    .any(|a| a.id != account_id && a.number == *number)
            {
                return Err(EngineError::DuplicateAccountNumber(number.clone()));
            }
            if let Some(name) = &patch.name
                && tables
                    .accounts
                    .values()
                    .any(|a| a.id != account_id && a.name == *name)
            {
                return Err(EngineError::DuplicateAccountName(name.clone()));
            }

            let account = tables
                .accounts
                .get_mut(&account_id)
                .ok_or(EngineError::AccountNotFound(account_id))?;
            let before = serde_json::to_value(&*account).ok();
            account.apply(patch);

            (before, account.clone())
        };

        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Update,
            table_name: "accounts",
            record_id: account_id.to_string(),
            before,
            after: serde_json::to_value(&updated).ok(),
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Deactivates an account so it can no longer be used on new lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or
    /// `CannotDeactivate` if its balance is nonzero.
    pub fn deactivate(&self, account_id: AccountId, actor: &Actor) -> Result<Account, EngineError> {
        let (before, updated) = {
            let mut tables = self.store.write();
            let account = tables
                .accounts
                .get_mut(&account_id)
                .ok_or(EngineError::AccountNotFound(account_id))?;

            account.ensure_deactivatable()?;
            let before = serde_json::to_value(&*account).ok();
            account.is_active = false;

            (before, account.clone())
        };

        tracing::info!(account_id = %account_id, "account deactivated");
        self.audit.record(AuditEvent {
            actor: actor.id,
            action: AuditAction::Update,
            table_name: "accounts",
            record_id: account_id.to_string(),
            before,
            after: serde_json::to_value(&updated).ok(),
            occurred_at: Utc::now(),
        });

        Ok(updated)
    }

    /// Gets an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn get(&self, account_id: AccountId) -> Result<Account, EngineError> {
        self.store
            .read()
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or(EngineError::AccountNotFound(account_id))
    }

    /// Finds an account by its unique number.
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Option<Account> {
        self.store
            .read()
            .accounts
            .values()
            .find(|a| a.number == number)
            .cloned()
    }

    /// Lists accounts ordered by account number.
    #[must_use]
    pub fn list(&self, active_only: bool) -> Vec<Account> {
        let tables = self.store.read();
        let mut accounts: Vec<_> = tables
            .accounts
            .values()
            .filter(|a| !active_only || a.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }
}
