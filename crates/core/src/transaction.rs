use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Money;

/// Category assigned to money coming in that has not been allotted yet.
pub const TO_BE_BUDGETED: &str = "To be budgeted";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    #[error("Negative {field}: {amount}")]
    NegativeAmount { field: &'static str, amount: Money },
    #[error("Both outflow ({outflow}) and inflow ({inflow}) are set")]
    BothSides { outflow: Money, inflow: Money },
}

/// In-progress record threaded through the normalization transforms. Every
/// `with_*` call consumes the draft and hands back the updated copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub category: String,
    pub memo: String,
    pub outflow: Money,
    pub inflow: Money,
}

impl TransactionDraft {
    /// Splits a signed source amount: negative goes to outflow, the rest to inflow.
    pub fn from_signed(date: NaiveDate, amount: Money) -> Self {
        let (outflow, inflow) = if amount.is_negative() {
            (amount.abs(), Money::zero())
        } else {
            (Money::zero(), amount)
        };
        TransactionDraft {
            date,
            payee: None,
            category: String::new(),
            memo: String::new(),
            outflow,
            inflow,
        }
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        TransactionDraft { date, ..self }
    }

    pub fn with_payee(self, payee: impl Into<String>) -> Self {
        TransactionDraft {
            payee: Some(payee.into()),
            ..self
        }
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        TransactionDraft {
            category: category.into(),
            ..self
        }
    }

    pub fn with_memo(self, memo: impl Into<String>) -> Self {
        TransactionDraft {
            memo: memo.into(),
            ..self
        }
    }

    pub fn append_memo(self, text: &str) -> Self {
        let memo = self.memo.clone() + text;
        self.with_memo(memo)
    }

    pub fn has_payee(&self) -> bool {
        self.payee.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// The budgeting-import record every adapter produces. Two records are the
/// same transaction iff every field compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub category: String,
    pub memo: String,
    pub outflow: Money,
    pub inflow: Money,
}

impl CanonicalTransaction {
    pub fn validate(draft: TransactionDraft) -> Result<CanonicalTransaction, TransactionError> {
        if draft.outflow.is_negative() {
            return Err(TransactionError::NegativeAmount {
                field: "outflow",
                amount: draft.outflow,
            });
        }
        if draft.inflow.is_negative() {
            return Err(TransactionError::NegativeAmount {
                field: "inflow",
                amount: draft.inflow,
            });
        }
        if draft.outflow.is_positive() && draft.inflow.is_positive() {
            return Err(TransactionError::BothSides {
                outflow: draft.outflow,
                inflow: draft.inflow,
            });
        }

        // An empty payee does not survive a trip through a canonical file.
        let payee = draft.payee.filter(|p| !p.is_empty());

        Ok(CanonicalTransaction {
            date: draft.date,
            payee,
            category: draft.category,
            memo: draft.memo,
            outflow: draft.outflow,
            inflow: draft.inflow,
        })
    }

    pub fn scaled(&self, factor: Decimal) -> CanonicalTransaction {
        CanonicalTransaction {
            outflow: self.outflow * factor,
            inflow: self.inflow * factor,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn negative_amount_becomes_outflow() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-4999));
        assert_eq!(d.outflow, Money::from_cents(4999));
        assert!(d.inflow.is_zero());
    }

    #[test]
    fn positive_amount_becomes_inflow() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(25000));
        assert_eq!(d.inflow, Money::from_cents(25000));
        assert!(d.outflow.is_zero());
    }

    #[test]
    fn zero_amount_is_neither() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::zero());
        assert!(d.inflow.is_zero());
        assert!(d.outflow.is_zero());
    }

    #[test]
    fn builder_returns_updated_copies() {
        let base = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-100));
        let updated = base
            .clone()
            .with_payee("REMA 1000")
            .with_category("Groceries")
            .with_memo("Varekjøp")
            .append_memo(" (1234.56.78901)");
        assert_eq!(base.payee, None);
        assert_eq!(updated.payee.as_deref(), Some("REMA 1000"));
        assert_eq!(updated.category, "Groceries");
        assert_eq!(updated.memo, "Varekjøp (1234.56.78901)");
    }

    #[test]
    fn validate_accepts_split_draft() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-100));
        let tx = CanonicalTransaction::validate(d).unwrap();
        assert_eq!(tx.outflow.to_string(), "1.00");
    }

    #[test]
    fn validate_rejects_both_sides() {
        let mut d = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-100));
        d.inflow = Money::from_cents(100);
        assert!(matches!(
            CanonicalTransaction::validate(d),
            Err(TransactionError::BothSides { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative() {
        let mut d = TransactionDraft::from_signed(date(2024, 1, 15), Money::zero());
        d.inflow = Money::from_cents(-1);
        assert!(matches!(
            CanonicalTransaction::validate(d),
            Err(TransactionError::NegativeAmount { field: "inflow", .. })
        ));
    }

    #[test]
    fn validate_drops_empty_payee() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::zero()).with_payee("");
        assert_eq!(CanonicalTransaction::validate(d).unwrap().payee, None);
    }

    #[test]
    fn equality_is_structural() {
        let make = |memo: &str| {
            CanonicalTransaction::validate(
                TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-100))
                    .with_payee("Kiwi")
                    .with_memo(memo),
            )
            .unwrap()
        };
        assert_eq!(make("a"), make("a"));
        assert_ne!(make("a"), make("b"));
    }

    #[test]
    fn scaled_multiplies_both_sides() {
        let d = TransactionDraft::from_signed(date(2024, 1, 15), Money::from_cents(-1000));
        let tx = CanonicalTransaction::validate(d).unwrap();
        let half = tx.scaled(Decimal::new(5, 1));
        assert_eq!(half.outflow, Money::from_cents(500));
        assert!(half.inflow.is_zero());
        assert_eq!(half.payee, tx.payee);
    }
}
