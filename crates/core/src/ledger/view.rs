//! Per-account ledger views with running balances.
//!
//! A [`LedgerView`] holds an account's postings in chronological order
//! and yields rows whose running balance is derived fresh on every
//! iteration by folding onto the account's initial balance. The balance
//! is never stored per row; only the live account aggregate is stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finbook_shared::types::{AccountId, JournalEntryId};

use crate::account::{Account, Side};
use crate::ledger::posting::LedgerPosting;

/// An inclusive, optionally open-ended date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive start date.
    pub start: Option<NaiveDate>,
    /// Inclusive end date.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Creates a bounded range.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns true if `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// One row of a ledger view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The row's business date.
    pub date: NaiveDate,
    /// The source journal entry (absent on the opening row).
    pub reference: Option<JournalEntryId>,
    /// Row description.
    pub description: String,
    /// Debit amount (zero on credit and opening rows).
    #[serde(with = "rust_decimal::serde::str")]
    pub debit: Decimal,
    /// Credit amount (zero on debit and opening rows).
    #[serde(with = "rust_decimal::serde::str")]
    pub credit: Decimal,
    /// Running balance after this row.
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

/// A chronological ledger view of a single account.
#[derive(Debug, Clone)]
pub struct LedgerView {
    /// The account this view is for.
    pub account_id: AccountId,
    normal_side: Side,
    initial_balance: Decimal,
    opening_date: NaiveDate,
    include_opening: bool,
    postings: Vec<LedgerPosting>,
}

impl LedgerView {
    /// Builds a view over the account's postings within `range`.
    ///
    /// Postings are ordered by transaction date, then post timestamp.
    /// A synthetic opening row is prepended when the view is unfiltered
    /// and there is anything to show (postings, or a nonzero initial
    /// balance), or when the account's creation date falls inside the
    /// filter and the same condition holds.
    #[must_use]
    pub fn build(account: &Account, postings: Vec<LedgerPosting>, range: DateRange) -> Self {
        let mut postings = postings;
        postings.retain(|p| range.contains(p.transaction_date));
        postings.sort_by_key(|p| (p.transaction_date, p.posted_at));

        let opening_date = account.created_at.date_naive();
        let has_rows = !postings.is_empty() || !account.initial_balance.is_zero();
        let include_opening = if range.is_unbounded() {
            has_rows
        } else {
            range.contains(opening_date) && has_rows
        };

        Self {
            account_id: account.id,
            normal_side: account.normal_side,
            initial_balance: account.initial_balance,
            opening_date,
            include_opening,
            postings,
        }
    }

    /// Returns a lazy iterator over the view's rows.
    ///
    /// The running balance is derived during iteration; calling `rows`
    /// again restarts the fold from the initial balance.
    #[must_use]
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            view: self,
            next_posting: 0,
            balance: self.initial_balance,
            opening_pending: self.include_opening,
        }
    }

    /// Number of rows the view will yield, including the opening row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.postings.len() + usize::from(self.include_opening)
    }

    /// Returns true if the view yields no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lazy row iterator over a [`LedgerView`].
#[derive(Debug)]
pub struct Rows<'a> {
    view: &'a LedgerView,
    next_posting: usize,
    balance: Decimal,
    opening_pending: bool,
}

impl Iterator for Rows<'_> {
    type Item = LedgerRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.opening_pending {
            self.opening_pending = false;
            return Some(LedgerRow {
                date: self.view.opening_date,
                reference: None,
                description: "Opening Balance".to_string(),
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
                balance: self.view.initial_balance,
            });
        }

        let posting = self.view.postings.get(self.next_posting)?;
        self.next_posting += 1;
        self.balance += self
            .view
            .normal_side
            .balance_change(posting.side(), posting.amount());

        Some(LedgerRow {
            date: posting.transaction_date,
            reference: Some(posting.entry_id),
            description: posting.description.clone(),
            debit: posting.debit,
            credit: posting.credit,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.postings.len() - self.next_posting
            + usize::from(self.opening_pending);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}
