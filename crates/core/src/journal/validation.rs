//! Balance validation for candidate journal entry lines.
//!
//! Pure functions over input lines; account existence is injected as a
//! lookup closure so validation carries no storage dependency.

use rust_decimal::Decimal;

use finbook_shared::types::AccountId;

use crate::account::{Account, Side};
use crate::error::EngineError;
use crate::journal::types::LineInput;

/// The slice of account state validation needs.
#[derive(Debug, Clone, Copy)]
pub struct AccountRef {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account may be used on new lines.
    pub is_active: bool,
}

impl From<&Account> for AccountRef {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            is_active: account.is_active,
        }
    }
}

/// Debit and credit totals of a candidate line set.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
    /// Whether the totals are equal.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debits: Decimal, credits: Decimal) -> Self {
        Self {
            debits,
            credits,
            is_balanced: debits == credits,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}

/// Validates a candidate line set for a journal entry.
///
/// Checks, in order: at least 2 lines; every amount strictly positive;
/// every account reference resolves to an active account; both sides
/// represented; debit total equals credit total exactly (decimal
/// equality, no rounding tolerance). No side effects.
///
/// # Errors
///
/// Returns the first violated rule; an unbalanced entry reports both
/// totals.
pub fn validate_lines<A>(lines: &[LineInput], account_lookup: A) -> Result<EntryTotals, EngineError>
where
    A: Fn(AccountId) -> Option<AccountRef>,
{
    if lines.len() < 2 {
        return Err(EngineError::InsufficientLines { count: lines.len() });
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount.is_zero() {
            return Err(EngineError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(EngineError::NegativeAmount {
                amount: line.amount,
            });
        }

        let account = account_lookup(line.account_id)
            .ok_or(EngineError::UnknownLineAccount(line.account_id))?;
        if !account.is_active {
            return Err(EngineError::InactiveLineAccount(line.account_id));
        }

        match line.side {
            Side::Debit => {
                debits += line.amount;
                has_debit = true;
            }
            Side::Credit => {
                credits += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(EngineError::SingleSided);
    }

    let totals = EntryTotals::new(debits, credits);
    if !totals.is_balanced {
        return Err(EngineError::Unbalanced { debits, credits });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(side: Side, amount: Decimal) -> LineInput {
        LineInput {
            account_id: AccountId::new(),
            side,
            amount,
        }
    }

    fn any_account(id: AccountId) -> Option<AccountRef> {
        Some(AccountRef { id, is_active: true })
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            line(Side::Debit, dec!(100.00)),
            line(Side::Credit, dec!(100.00)),
        ];
        let totals = validate_lines(&lines, any_account).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debits, dec!(100.00));
        assert_eq!(totals.credits, dec!(100.00));
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_unbalanced_reports_both_totals() {
        let lines = vec![
            line(Side::Debit, dec!(100.00)),
            line(Side::Credit, dec!(90.00)),
        ];
        match validate_lines(&lines, any_account) {
            Err(EngineError::Unbalanced { debits, credits }) => {
                assert_eq!(debits, dec!(100.00));
                assert_eq!(credits, dec!(90.00));
            }
            other => panic!("expected Unbalanced, got {other:?}"),
        }
    }

    #[test]
    fn test_too_few_lines() {
        assert!(matches!(
            validate_lines(&[line(Side::Debit, dec!(100.00))], any_account),
            Err(EngineError::InsufficientLines { count: 1 })
        ));
        assert!(matches!(
            validate_lines(&[], any_account),
            Err(EngineError::InsufficientLines { count: 0 })
        ));
    }

    #[test]
    fn test_zero_amount() {
        let lines = vec![line(Side::Debit, dec!(0)), line(Side::Credit, dec!(100.00))];
        assert!(matches!(
            validate_lines(&lines, any_account),
            Err(EngineError::ZeroAmount)
        ));
    }

    #[test]
    fn test_negative_amount() {
        let lines = vec![
            line(Side::Debit, dec!(-50.00)),
            line(Side::Credit, dec!(100.00)),
        ];
        assert!(matches!(
            validate_lines(&lines, any_account),
            Err(EngineError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_single_sided() {
        let lines = vec![
            line(Side::Debit, dec!(50.00)),
            line(Side::Debit, dec!(50.00)),
        ];
        assert!(matches!(
            validate_lines(&lines, any_account),
            Err(EngineError::SingleSided)
        ));
    }

    #[test]
    fn test_unknown_account() {
        let lines = vec![
            line(Side::Debit, dec!(100.00)),
            line(Side::Credit, dec!(100.00)),
        ];
        let result = validate_lines(&lines, |_| None);
        assert!(matches!(result, Err(EngineError::UnknownLineAccount(_))));
    }

    #[test]
    fn test_inactive_account() {
        let lines = vec![
            line(Side::Debit, dec!(100.00)),
            line(Side::Credit, dec!(100.00)),
        ];
        let result = validate_lines(&lines, |id| Some(AccountRef { id, is_active: false }));
        assert!(matches!(result, Err(EngineError::InactiveLineAccount(_))));
    }

    #[test]
    fn test_exact_decimal_equality_no_tolerance() {
        let lines = vec![
            line(Side::Debit, dec!(100.004)),
            line(Side::Credit, dec!(100.00)),
        ];
        assert!(matches!(
            validate_lines(&lines, any_account),
            Err(EngineError::Unbalanced { .. })
        ));
    }

    /// Strategy for positive cent amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Mirrored debit/credit line sets always validate, and the
        /// totals equal the sum of the generated amounts.
        #[test]
        fn prop_mirrored_lines_always_balance(
            amounts in prop::collection::vec(amount_strategy(), 1..10),
        ) {
            let mut lines = Vec::with_capacity(amounts.len() * 2);
            for amount in &amounts {
                lines.push(line(Side::Debit, *amount));
                lines.push(line(Side::Credit, *amount));
            }

            let totals = validate_lines(&lines, any_account).unwrap();
            let expected: Decimal = amounts.iter().copied().sum();
            prop_assert!(totals.is_balanced);
            prop_assert_eq!(totals.debits, expected);
            prop_assert_eq!(totals.credits, expected);
        }

        /// Perturbing one side of a balanced set always fails with the
        /// exact totals reported.
        #[test]
        fn prop_perturbed_lines_never_balance(
            amounts in prop::collection::vec(amount_strategy(), 1..10),
            extra in amount_strategy(),
        ) {
            let mut lines = Vec::with_capacity(amounts.len() * 2 + 1);
            for amount in &amounts {
                lines.push(line(Side::Debit, *amount));
                lines.push(line(Side::Credit, *amount));
            }
            lines.push(line(Side::Debit, extra));

            let base: Decimal = amounts.iter().copied().sum();
            match validate_lines(&lines, any_account) {
                Err(EngineError::Unbalanced { debits, credits }) => {
                    prop_assert_eq!(debits, base + extra);
                    prop_assert_eq!(credits, base);
                }
                other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
            }
        }
    }
}
