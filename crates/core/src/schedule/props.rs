//! Property tests for schedule derivation.

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;

use super::service::ScheduleService;
use super::types::{ArrivalBasis, ArrivalInputs};

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2023i32..2027i32, 1u32..13u32, 1u32..29u32).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Business-day addition never lands on a weekend (for at least one day
    /// added) and always moves forward.
    #[test]
    fn prop_business_days_skip_weekends(
        start in date_strategy(),
        days in 1u32..60,
    ) {
        let end = ScheduleService::add_business_days(start, days);
        prop_assert!(end > start);
        prop_assert!(!matches!(end.weekday(), Weekday::Sat | Weekday::Sun));
    }

    /// Business-day addition is compositional:
    /// add(a + b) == add(add(a), b).
    #[test]
    fn prop_business_days_compose(
        start in date_strategy(),
        a in 0u32..30,
        b in 0u32..30,
    ) {
        prop_assume!(!matches!(start.weekday(), Weekday::Sat | Weekday::Sun));
        let combined = ScheduleService::add_business_days(start, a + b);
        let stepped = ScheduleService::add_business_days(
            ScheduleService::add_business_days(start, a),
            b,
        );
        prop_assert_eq!(combined, stepped);
    }

    /// When an ETA is present the arrival basis is always ETA + 10,
    /// regardless of which other inputs are set.
    #[test]
    fn prop_eta_always_wins(
        eta in date_strategy(),
        etd in proptest::option::of(date_strategy()),
        real_end in proptest::option::of(date_strategy()),
        planned_end in proptest::option::of(date_strategy()),
    ) {
        let inputs = ArrivalInputs {
            eta: Some(eta),
            etd,
            production_real_end: real_end,
            production_end: planned_end,
        };
        let (_, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        prop_assert_eq!(basis, ArrivalBasis::EtaPlusTen);
    }

    /// Without voyage dates, the real production end always beats the
    /// planned one.
    #[test]
    fn prop_real_end_beats_planned_end(
        real_end in date_strategy(),
        planned_end in proptest::option::of(date_strategy()),
    ) {
        let inputs = ArrivalInputs {
            production_real_end: Some(real_end),
            production_end: planned_end,
            ..ArrivalInputs::default()
        };
        let (_, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        prop_assert_eq!(basis, ArrivalBasis::RealEndPlusFiftyThree);
    }

    /// The derivation is total: it only returns None when every input is
    /// absent.
    #[test]
    fn prop_any_input_produces_a_date(
        eta in proptest::option::of(date_strategy()),
        etd in proptest::option::of(date_strategy()),
        real_end in proptest::option::of(date_strategy()),
        planned_end in proptest::option::of(date_strategy()),
    ) {
        let inputs = ArrivalInputs {
            eta,
            etd,
            production_real_end: real_end,
            production_end: planned_end,
        };
        let expect_some = eta.is_some() || etd.is_some() || real_end.is_some() || planned_end.is_some();
        prop_assert_eq!(ScheduleService::arrival_date(&inputs).is_some(), expect_some);
    }
}
