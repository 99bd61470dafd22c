//! Integration tests for the account registry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use finbook_core::account::{AccountCategory, AccountPatch, CreateAccountInput, Side};
use finbook_core::actor::{Actor, Role};
use finbook_core::audit::{AuditAction, InMemoryAuditLog};
use finbook_core::error::EngineError;
use finbook_shared::types::{AccountId, UserId};
use finbook_store::{AccountRepository, MemoryStore};

fn setup() -> (AccountRepository, Arc<InMemoryAuditLog>, Actor) {
    let store = Arc::new(MemoryStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let repo = AccountRepository::new(store, audit.clone());
    let admin = Actor::new(UserId::new(), Role::Administrator);
    (repo, audit, admin)
}

fn input(number: &str, name: &str, initial: Decimal) -> CreateAccountInput {
    CreateAccountInput {
        number: number.to_string(),
        name: name.to_string(),
        description: Some("test account".to_string()),
        normal_side: Side::Debit,
        category: AccountCategory::Asset,
        initial_balance: initial,
    }
}

#[test]
fn test_create_and_get() {
    let (repo, _, admin) = setup();
    let account = repo.create(input("1010", "Cash", dec!(250.00)), &admin).unwrap();

    assert!(account.is_active);
    assert_eq!(account.balance, dec!(250.00));
    assert_eq!(account.initial_balance, dec!(250.00));
    assert_eq!(account.created_by, admin.id);

    let fetched = repo.get(account.id).unwrap();
    assert_eq!(fetched, account);
    assert_eq!(repo.find_by_number("1010").unwrap().id, account.id);
    assert!(repo.find_by_number("9999").is_none());
}

#[test]
fn test_duplicate_number_conflict() {
    let (repo, _, admin) = setup();
    repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();

    let result = repo.create(input("1010", "Petty Cash", dec!(0)), &admin);
    assert!(matches!(
        result,
        Err(EngineError::DuplicateAccountNumber(n)) if n == "1010"
    ));
}

#[test]
fn test_duplicate_name_conflict() {
    let (repo, _, admin) = setup();
    repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();

    let result = repo.create(input("1020", "Cash", dec!(0)), &admin);
    assert!(matches!(
        result,
        Err(EngineError::DuplicateAccountName(n)) if n == "Cash"
    ));
}

#[test]
fn test_update_checks_uniqueness_against_others() {
    let (repo, _, admin) = setup();
    let cash = repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();
    repo.create(input("1020", "Bank", dec!(0)), &admin).unwrap();

    // Re-asserting the account's own number is not a conflict.
    let same = repo.update(
        cash.id,
        AccountPatch {
            number: Some("1010".to_string()),
            ..AccountPatch::default()
        },
        &admin,
    );
    assert!(same.is_ok());

    let clash = repo.update(
        cash.id,
        AccountPatch {
            number: Some("1020".to_string()),
            ..AccountPatch::default()
        },
        &admin,
    );
    assert!(matches!(
        clash,
        Err(EngineError::DuplicateAccountNumber(_))
    ));

    let renamed = repo
        .update(
            cash.id,
            AccountPatch {
                name: Some("Cash on Hand".to_string()),
                ..AccountPatch::default()
            },
            &admin,
        )
        .unwrap();
    assert_eq!(renamed.name, "Cash on Hand");
    assert_eq!(renamed.balance, dec!(0));
}

#[test]
fn test_update_unknown_account() {
    let (repo, _, admin) = setup();
    assert!(matches!(
        repo.update(AccountId::new(), AccountPatch::default(), &admin),
        Err(EngineError::AccountNotFound(_))
    ));
}

#[test]
fn test_deactivate_zero_balance() {
    let (repo, _, admin) = setup();
    let account = repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();

    let deactivated = repo.deactivate(account.id, &admin).unwrap();
    assert!(!deactivated.is_active);

    assert_eq!(repo.list(true).len(), 0);
    assert_eq!(repo.list(false).len(), 1);
}

#[test]
fn test_deactivate_nonzero_balance_fails() {
    let (repo, _, admin) = setup();
    let account = repo.create(input("1010", "Cash", dec!(500.00)), &admin).unwrap();

    assert!(matches!(
        repo.deactivate(account.id, &admin),
        Err(EngineError::CannotDeactivate { balance }) if balance == dec!(500.00)
    ));
    assert!(repo.get(account.id).unwrap().is_active);
}

#[test]
fn test_list_ordered_by_number() {
    let (repo, _, admin) = setup();
    repo.create(input("4010", "Revenue", dec!(0)), &admin).unwrap();
    repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();
    repo.create(input("2010", "Loan", dec!(0)), &admin).unwrap();

    let numbers: Vec<_> = repo.list(false).into_iter().map(|a| a.number).collect();
    assert_eq!(numbers, vec!["1010", "2010", "4010"]);
}

#[test]
fn test_registry_writes_are_audited() {
    let (repo, audit, admin) = setup();
    let account = repo.create(input("1010", "Cash", dec!(0)), &admin).unwrap();
    repo.update(
        account.id,
        AccountPatch {
            description: Some("till money".to_string()),
            ..AccountPatch::default()
        },
        &admin,
    )
    .unwrap();
    repo.deactivate(account.id, &admin).unwrap();

    let events = audit.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].action, AuditAction::Create);
    assert_eq!(events[1].action, AuditAction::Update);
    assert_eq!(events[2].action, AuditAction::Update);
    assert!(events.iter().all(|e| e.table_name == "accounts"));
    assert!(events.iter().all(|e| e.actor == admin.id));

    // Update events carry before/after snapshots.
    assert!(events[1].before.is_some());
    assert!(events[1].after.is_some());
}
