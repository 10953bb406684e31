use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MoneyError {
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
}

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Parses the plain `123.45` form used in canonical files.
impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Money::zero());
        }
        Decimal::from_str(s)
            .map(Money::from_decimal)
            .map_err(|_| MoneyError::InvalidAmount(s.to_string()))
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;
    fn mul(self, rhs: Decimal) -> Self {
        Money::from_decimal(self.0 * rhs)
    }
}

// ── Locale-aware parsing ──────────────────────────────────────────────────────

/// Describes how a bank writes numbers. Passed explicitly to every parse so no
/// process-wide locale is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
}

impl NumberFormat {
    /// Norwegian bokmål: `1 234,56` with a no-break space for grouping.
    pub const NB_NO: NumberFormat = NumberFormat {
        decimal_separator: ',',
        grouping_separator: Some('\u{a0}'),
    };

    /// Parses a signed amount. More than two fraction digits is an error, never
    /// a rounding.
    pub fn parse(&self, s: &str) -> Result<Money, MoneyError> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| Some(*c) != self.grouping_separator && !c.is_whitespace())
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();
        if cleaned.is_empty() {
            return Err(MoneyError::InvalidAmount(s.to_string()));
        }
        let invalid = || MoneyError::InvalidAmount(s.to_string());
        let decimal = Decimal::from_str(&cleaned).map_err(|_| invalid())?;
        if decimal.normalize().scale() > 2 {
            return Err(invalid());
        }
        Ok(Money(decimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nb_no_decimal_comma() {
        assert_eq!(NumberFormat::NB_NO.parse("-150,50").unwrap(), Money::from_cents(-15050));
    }

    #[test]
    fn nb_no_accepts_decimal_point() {
        assert_eq!(NumberFormat::NB_NO.parse("99.90").unwrap(), Money::from_cents(9990));
    }

    #[test]
    fn nb_no_grouping_is_stripped() {
        assert_eq!(
            NumberFormat::NB_NO.parse("12\u{a0}345,00").unwrap(),
            Money::from_cents(1_234_500)
        );
        assert_eq!(NumberFormat::NB_NO.parse("1 000").unwrap(), Money::from_cents(100_000));
    }

    #[test]
    fn nb_no_rejects_dot_grouping_with_comma_decimal() {
        assert!(NumberFormat::NB_NO.parse("1.234,56").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(NumberFormat::NB_NO.parse("").is_err());
        assert!(NumberFormat::NB_NO.parse("abc").is_err());
    }

    #[test]
    fn parse_rejects_sub_cent_amounts() {
        assert_eq!(
            NumberFormat::NB_NO.parse("-1.234"),
            Err(MoneyError::InvalidAmount("-1.234".to_string()))
        );
        assert!(NumberFormat::NB_NO.parse("0,005").is_err());
        assert_eq!(NumberFormat::NB_NO.parse("2,500").unwrap(), Money::from_cents(250));
    }

    #[test]
    fn from_str_empty_is_zero() {
        assert_eq!("".parse::<Money>().unwrap(), Money::zero());
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::from_cents(1250));
    }

    #[test]
    fn equality_ignores_scale() {
        let a: Money = "10.0".parse().unwrap();
        let b: Money = "10.00".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-1).to_string(), "-0.01");
    }

    #[test]
    fn multiply_rounds_to_cents() {
        let m = Money::from_cents(1001) * Decimal::new(5, 1);
        assert_eq!(m, Money::from_decimal(Decimal::new(5005, 3)));
        assert_eq!(m.to_string(), "5.00");
    }
}
