//! Currency service for conversion and rounding operations.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Use banker's rounding (round half to even) to minimize cumulative errors
//! - Stored balances are kept at 2 decimal places

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Currency service for conversion and rounding operations.
///
/// Provides methods for converting amounts between currencies using
/// Banker's Rounding (MidpointNearestEven) strategy.
pub struct CurrencyService;

impl CurrencyService {
    /// Convert amount using a conversion factor with Banker's Rounding.
    ///
    /// Uses `RoundingStrategy::MidpointNearestEven` (Banker's Rounding) which:
    /// - Rounds 2.5 → 2 (to nearest even)
    /// - Rounds 3.5 → 4 (to nearest even)
    ///
    /// # Returns
    ///
    /// The converted amount rounded to 4 decimal places.
    #[must_use]
    pub fn convert(amount: Decimal, rate: Decimal) -> Decimal {
        (amount * rate).round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven)
    }

    /// Round a decimal value using Banker's Rounding.
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }

    /// Round a monetary amount to the 2 decimal places used for stored
    /// balances.
    #[must_use]
    pub fn round_money(value: Decimal) -> Decimal {
        Self::round(value, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_basic() {
        // 100 * 1.5 = 150
        let result = CurrencyService::convert(dec!(100), dec!(1.5));
        assert_eq!(result, dec!(150.0000));
    }

    #[test]
    fn test_convert_same_currency() {
        // Same currency: rate = 1, result = source
        let result = CurrencyService::convert(dec!(100.50), Decimal::ONE);
        assert_eq!(result, dec!(100.5000));
    }

    #[test]
    fn test_convert_rounds_to_4_decimals() {
        // 100 * 1.23456789 = 123.456789 → rounds to 123.4568
        let result = CurrencyService::convert(dec!(100), dec!(1.23456789));
        assert_eq!(result, dec!(123.4568));
    }

    #[test]
    fn test_bankers_rounding_midpoint_to_even() {
        // 2.5 → 2 (nearest even)
        assert_eq!(CurrencyService::round(dec!(2.5), 0), dec!(2));

        // 3.5 → 4 (nearest even)
        assert_eq!(CurrencyService::round(dec!(3.5), 0), dec!(4));

        // 2.25 → 2.2 (nearest even at 1 decimal)
        assert_eq!(CurrencyService::round(dec!(2.25), 1), dec!(2.2));

        // 2.35 → 2.4 (nearest even at 1 decimal)
        assert_eq!(CurrencyService::round(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_two_decimals() {
        assert_eq!(CurrencyService::round_money(dec!(1507550.255)), dec!(1507550.26));
        assert_eq!(CurrencyService::round_money(dec!(99.005)), dec!(99.00));
    }
}
