//! Property tests for currency conversion.

use mobilia_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::matrix::ConversionMatrix;
use super::service::CurrencyService;

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

/// Positive factors in a plausible FX range (0.001 .. 100.0).
fn factor_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 3))
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting through a factor and back through its exact inverse
    /// recovers the amount within rounding tolerance.
    #[test]
    fn prop_round_trip_with_inverse_factors(
        from in currency_strategy(),
        to in currency_strategy(),
        factor in factor_strategy(),
        amount in amount_strategy(),
    ) {
        prop_assume!(from != to);

        let matrix = ConversionMatrix::from_factors([
            (from, to, factor),
            (to, from, Decimal::ONE / factor),
        ]).unwrap();

        let there = matrix.convert(amount, from, to).unwrap();
        let back = matrix.convert(there, to, from).unwrap();

        let tolerance = Decimal::new(1, 2); // one cent
        prop_assert!(
            (CurrencyService::round_money(back) - amount).abs() <= tolerance,
            "{amount} -> {there} -> {back}"
        );
    }

    /// Identity conversion is exact for every currency.
    #[test]
    fn prop_identity_conversion_is_exact(
        currency in currency_strategy(),
        amount in amount_strategy(),
    ) {
        let matrix = ConversionMatrix::from_factors([]).unwrap();
        prop_assert_eq!(matrix.convert(amount, currency, currency).unwrap(), amount);
    }

    /// A pair with no configured factor always errors; it never converts to
    /// zero.
    #[test]
    fn prop_unmapped_pair_never_yields_zero(
        from in currency_strategy(),
        to in currency_strategy(),
        amount in amount_strategy(),
    ) {
        prop_assume!(from != to);
        let matrix = ConversionMatrix::from_factors([]).unwrap();
        prop_assert!(matrix.convert(amount, from, to).is_err());
    }

    /// Conversion scales linearly in the amount.
    #[test]
    fn prop_conversion_is_linear(
        from in currency_strategy(),
        to in currency_strategy(),
        factor in factor_strategy(),
        amount in amount_strategy(),
    ) {
        prop_assume!(from != to);
        let matrix = ConversionMatrix::from_factors([(from, to, factor)]).unwrap();

        let single = matrix.convert(amount, from, to).unwrap();
        let double = matrix.convert(amount + amount, from, to).unwrap();
        prop_assert_eq!(double, single + single);
    }
}
