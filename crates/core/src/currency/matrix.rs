//! Fixed conversion-factor matrix between the settlement currencies.
//!
//! The business settles in three currencies with a fixed factor table loaded
//! from configuration, not a live exchange-rate feed.

use std::collections::HashMap;

use mobilia_shared::config::FxConfig;
use mobilia_shared::types::Currency;
use rust_decimal::Decimal;

use super::error::CurrencyError;

/// Fixed 3x3 conversion-factor table.
///
/// Identity pairs always convert with factor 1 and need no configuration.
#[derive(Debug, Clone)]
pub struct ConversionMatrix {
    factors: HashMap<(Currency, Currency), Decimal>,
}

impl ConversionMatrix {
    /// Builds a matrix from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured factor is zero or negative.
    pub fn from_config(config: &FxConfig) -> Result<Self, CurrencyError> {
        let mut factors = HashMap::with_capacity(config.factors.len());
        for entry in &config.factors {
            if entry.rate <= Decimal::ZERO {
                return Err(CurrencyError::NonPositiveFactor {
                    from: entry.from,
                    to: entry.to,
                });
            }
            factors.insert((entry.from, entry.to), entry.rate);
        }
        Ok(Self { factors })
    }

    /// Builds a matrix from explicit factor entries. Used by tests and
    /// callers that do not go through `AppConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if any factor is zero or negative.
    pub fn from_factors(
        entries: impl IntoIterator<Item = (Currency, Currency, Decimal)>,
    ) -> Result<Self, CurrencyError> {
        let mut factors = HashMap::new();
        for (from, to, rate) in entries {
            if rate <= Decimal::ZERO {
                return Err(CurrencyError::NonPositiveFactor { from, to });
            }
            factors.insert((from, to), rate);
        }
        Ok(Self { factors })
    }

    /// Returns the factor for a currency pair, if configured.
    #[must_use]
    pub fn factor(&self, from: Currency, to: Currency) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        self.factors.get(&(from, to)).copied()
    }

    /// Converts an amount between settlement currencies.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::MissingFactor` when the pair is not in the
    /// table. The legacy system converted such pairs to zero; callers that
    /// want that behavior must opt in explicitly.
    pub fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, CurrencyError> {
        let factor = self
            .factor(from, to)
            .ok_or(CurrencyError::MissingFactor { from, to })?;
        Ok(amount * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_matrix() -> ConversionMatrix {
        use Currency::{Eur, Mxn, Usd};
        ConversionMatrix::from_factors([
            (Usd, Eur, dec!(0.92)),
            (Mxn, Eur, dec!(0.05)),
            (Eur, Usd, dec!(1.09)),
            (Mxn, Usd, dec!(0.055)),
            (Eur, Mxn, dec!(19.87)),
            (Usd, Mxn, dec!(18.23)),
        ])
        .unwrap()
    }

    #[test]
    fn test_identity_pair_is_one() {
        let matrix = ConversionMatrix::from_factors([]).unwrap();
        assert_eq!(
            matrix.convert(dec!(250.50), Currency::Eur, Currency::Eur),
            Ok(dec!(250.50))
        );
    }

    #[test]
    fn test_convert_applies_factor() {
        let matrix = full_matrix();
        assert_eq!(
            matrix.convert(dec!(100), Currency::Usd, Currency::Eur),
            Ok(dec!(92.00))
        );
        assert_eq!(
            matrix.convert(dec!(10), Currency::Eur, Currency::Mxn),
            Ok(dec!(198.70))
        );
    }

    #[test]
    fn test_missing_pair_is_an_error_not_zero() {
        let matrix = ConversionMatrix::from_factors([(
            Currency::Eur,
            Currency::Usd,
            dec!(1.09),
        )])
        .unwrap();
        assert_eq!(
            matrix.convert(dec!(100), Currency::Usd, Currency::Eur),
            Err(CurrencyError::MissingFactor {
                from: Currency::Usd,
                to: Currency::Eur
            })
        );
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let err = ConversionMatrix::from_factors([(Currency::Eur, Currency::Usd, dec!(0))]);
        assert_eq!(
            err.unwrap_err(),
            CurrencyError::NonPositiveFactor {
                from: Currency::Eur,
                to: Currency::Usd
            }
        );
    }

    #[test]
    fn test_default_config_builds() {
        let matrix = ConversionMatrix::from_config(&mobilia_shared::config::FxConfig::default())
            .unwrap();
        for from in Currency::ALL {
            for to in Currency::ALL {
                assert!(matrix.factor(from, to).is_some(), "{from}->{to}");
            }
        }
    }
}
