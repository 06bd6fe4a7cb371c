//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major currency units.
    pub amount: Decimal,
    /// The settlement currency.
    pub currency: Currency,
}

/// Settlement currencies handled by the business.
///
/// Quotations are priced in parallel in these three currencies; one of them
/// is the authoritative view and the other two are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    Eur,
    /// US Dollar
    Usd,
    /// Mexican Peso
    Mxn,
}

impl Currency {
    /// All settlement currencies, in display order.
    pub const ALL: [Self; 3] = [Self::Eur, Self::Usd, Self::Mxn];
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
            Self::Mxn => write!(f, "MXN"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "MXN" => Ok(Self::Mxn),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, Currency::Eur);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Eur);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Mxn);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, Currency::Mxn);
    }

    #[test]
    fn test_money_is_negative() {
        let positive = Money::new(dec!(10), Currency::Usd);
        assert!(!positive.is_negative());

        let negative = Money::new(dec!(-10), Currency::Usd);
        assert!(negative.is_negative());

        let zero = Money::new(dec!(0), Currency::Usd);
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Mxn.to_string(), "MXN");
    }

    #[rstest::rstest]
    #[case("EUR", Currency::Eur)]
    #[case("eur", Currency::Eur)]
    #[case("USD", Currency::Usd)]
    #[case("MXN", Currency::Mxn)]
    fn test_currency_from_str(#[case] input: &str, #[case] expected: Currency) {
        assert_eq!(Currency::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_currency_from_str_rejects_unknown() {
        assert!(Currency::from_str("GBP").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_currency_all_is_exhaustive() {
        assert_eq!(Currency::ALL.len(), 3);
        for currency in Currency::ALL {
            assert_eq!(Currency::from_str(&currency.to_string()).unwrap(), currency);
        }
    }
}
