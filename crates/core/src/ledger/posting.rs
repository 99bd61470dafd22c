//! Ledger postings and balance application.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finbook_shared::types::{AccountId, JournalEntryId, PostingId};

use crate::account::{Account, Side};
use crate::journal::JournalEntry;

/// An immutable ledger row recording one side of one journal entry
/// line against one account.
///
/// Postings are append-only: created once at approval time, never
/// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPosting {
    /// Unique identifier.
    pub id: PostingId,
    /// The account this posting is against.
    pub account_id: AccountId,
    /// The journal entry this posting derives from.
    pub entry_id: JournalEntryId,
    /// The business date (the entry's entry date).
    pub transaction_date: NaiveDate,
    /// Description carried from the entry.
    pub description: String,
    /// Debit amount (zero for credit postings).
    #[serde(with = "rust_decimal::serde::str")]
    pub debit: Decimal,
    /// Credit amount (zero for debit postings).
    #[serde(with = "rust_decimal::serde::str")]
    pub credit: Decimal,
    /// When the posting was written.
    pub posted_at: DateTime<Utc>,
}

impl LedgerPosting {
    /// Returns the side this posting is on.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.credit > Decimal::ZERO {
            Side::Credit
        } else {
            Side::Debit
        }
    }

    /// Returns the posting amount (whichever of debit/credit is set).
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit + self.credit
    }
}

/// Builds the ledger postings for an approved entry: exactly one per
/// line, dated at the entry's entry date, with the debit or credit
/// field populated per line side and the other zero.
#[must_use]
pub fn postings_for_entry(entry: &JournalEntry, posted_at: DateTime<Utc>) -> Vec<LedgerPosting> {
    entry
        .lines
        .iter()
        .map(|line| {
            let (debit, credit) = match line.side {
                Side::Debit => (line.amount, Decimal::ZERO),
                Side::Credit => (Decimal::ZERO, line.amount),
            };
            LedgerPosting {
                id: PostingId::new(),
                account_id: line.account_id,
                entry_id: entry.id,
                transaction_date: entry.entry_date,
                description: entry.description.clone(),
                debit,
                credit,
                posted_at,
            }
        })
        .collect()
}

/// Applies one posting's balance effect to its account.
///
/// A posting on the account's normal side increases the balance, a
/// posting on the opposite side decreases it. This is the only place
/// the running balance is written.
pub fn post_to_account(account: &mut Account, posting: &LedgerPosting) {
    account.balance += account
        .normal_side
        .balance_change(posting.side(), posting.amount());
}

/// Replays postings over an initial balance, returning the derived
/// balance (used to reconcile the stored aggregate against the ledger).
#[must_use]
pub fn replay_balance<'a, I>(initial: Decimal, normal_side: Side, postings: I) -> Decimal
where
    I: IntoIterator<Item = &'a LedgerPosting>,
{
    postings.into_iter().fold(initial, |balance, posting| {
        balance + normal_side.balance_change(posting.side(), posting.amount())
    })
}
