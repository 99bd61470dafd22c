//! Chart of accounts.
//!
//! This module defines account records, their categories and normal
//! sides, and the balance-direction rule shared by the ledger poster
//! and reader.

pub mod types;

pub use types::{Account, AccountCategory, AccountPatch, CreateAccountInput, Side};
