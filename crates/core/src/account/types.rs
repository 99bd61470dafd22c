//! Account domain types and balance-direction rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use finbook_shared::types::{AccountId, UserId};

use crate::error::EngineError;

/// Debit/credit direction.
///
/// Serves both as the type of a journal line and as an account's normal
/// side (the direction in which its balance naturally increases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl Side {
    /// Returns the string representation of the side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Parses a side from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Calculates the balance change a posting causes on an account
    /// whose normal side is `self`.
    ///
    /// A posting on the account's normal side increases the balance;
    /// a posting on the opposite side decreases it. The rule is
    /// symmetric for debit-normal and credit-normal accounts.
    #[must_use]
    pub fn balance_change(self, line_side: Side, amount: Decimal) -> Decimal {
        if line_side == self { amount } else { -amount }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account category in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Asset account (debit-normal).
    Asset,
    /// Liability account (credit-normal).
    Liability,
    /// Equity account (credit-normal).
    Equity,
    /// Revenue account (credit-normal).
    Revenue,
    /// Expense account (debit-normal).
    Expense,
}

impl AccountCategory {
    /// Returns the conventional normal side for this category.
    #[must_use]
    pub const fn normal_side(&self) -> Side {
        match self {
            Self::Asset | Self::Expense => Side::Debit,
            Self::Liability | Self::Equity | Self::Revenue => Side::Credit,
        }
    }

    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chart of accounts entry.
///
/// `balance` is a denormalized running aggregate whose sole writer is
/// the ledger poster; `initial_balance` is fixed at creation and is the
/// basis for the ledger view's opening row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account number (unique across the registry).
    pub number: String,
    /// Account name (unique across the registry).
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// The side on which the balance naturally increases.
    pub normal_side: Side,
    /// Account category.
    pub category: AccountCategory,
    /// Balance at account creation.
    #[serde(with = "rust_decimal::serde::str")]
    pub initial_balance: Decimal,
    /// Current running balance.
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    /// Whether the account may be used on new journal lines.
    pub is_active: bool,
    /// The user who created the account.
    pub created_by: UserId,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account from registry input.
    ///
    /// The running balance starts equal to the initial balance.
    #[must_use]
    pub fn create(input: CreateAccountInput, created_by: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            number: input.number,
            name: input.name,
            description: input.description,
            normal_side: input.normal_side,
            category: input.category,
            initial_balance: input.initial_balance,
            balance: input.initial_balance,
            is_active: true,
            created_by,
            created_at: now,
        }
    }

    /// Checks whether the account may be deactivated.
    ///
    /// # Errors
    ///
    /// Returns `CannotDeactivate` if the balance is nonzero.
    pub fn ensure_deactivatable(&self) -> Result<(), EngineError> {
        if self.balance.is_zero() {
            Ok(())
        } else {
            Err(EngineError::CannotDeactivate {
                balance: self.balance,
            })
        }
    }

    /// Applies a registry patch. Never touches the balance fields.
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(normal_side) = patch.normal_side {
            self.normal_side = normal_side;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountInput {
    /// Account number (must be unique).
    pub number: String,
    /// Account name (must be unique).
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// The side on which the balance naturally increases.
    pub normal_side: Side,
    /// Account category.
    pub category: AccountCategory,
    /// Balance at account creation.
    #[serde(with = "rust_decimal::serde::str")]
    pub initial_balance: Decimal,
}

/// Partial update to an account's registry fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    /// New account number.
    pub number: Option<String>,
    /// New account name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New normal side.
    pub normal_side: Option<Side>,
    /// New category.
    pub category: Option<AccountCategory>,
}
