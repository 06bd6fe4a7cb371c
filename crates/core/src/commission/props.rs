//! Property tests for commission arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::CommissionCalculator;
use super::types::{CommissionInputs, StakeholderSplits};
use crate::commission::flat_split;
use mobilia_shared::types::UserId;

fn total_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Commission is linear in the percentage:
    /// compute(p1) + compute(p2) == compute(p1 + p2).
    #[test]
    fn prop_compute_is_linear_in_percentage(
        total in total_strategy(),
        p1 in percentage_strategy(),
        p2 in percentage_strategy(),
    ) {
        let split_sum = CommissionCalculator::compute(total, p1)
            + CommissionCalculator::compute(total, p2);
        let combined = CommissionCalculator::compute(total, p1 + p2);

        let tolerance = Decimal::new(1, 6);
        prop_assert!((split_sum - combined).abs() <= tolerance);
    }

    /// Commission is linear in the total.
    #[test]
    fn prop_compute_is_linear_in_total(
        total in total_strategy(),
        percentage in percentage_strategy(),
    ) {
        let single = CommissionCalculator::compute(total, percentage);
        let double = CommissionCalculator::compute(total + total, percentage);
        prop_assert_eq!(double, single + single);
    }

    /// The plan emits exactly one share per qualifying role instance.
    #[test]
    fn prop_share_count_matches_qualifying_instances(
        total in total_strategy(),
        manager_splits in prop::collection::vec(percentage_strategy(), 0..4),
        designer_splits in prop::collection::vec(percentage_strategy(), 0..4),
        with_showroom in any::<bool>(),
        referenced in proptest::option::of(percentage_strategy()),
    ) {
        let inputs = CommissionInputs {
            project_total: total,
            referenced_customer: referenced.map(|pct| (UserId::new(), pct)),
            project_managers: vec![StakeholderSplits {
                user_id: UserId::new(),
                splits: manager_splits.iter().copied().map(flat_split).collect(),
            }],
            designers: vec![StakeholderSplits {
                user_id: UserId::new(),
                splits: designer_splits.iter().copied().map(flat_split).collect(),
            }],
            showroom_manager: with_showroom.then(UserId::new),
            ..CommissionInputs::default()
        };

        let shares = CommissionCalculator::plan(&inputs).unwrap();
        let expected = manager_splits.len()
            + designer_splits.len()
            + usize::from(with_showroom)
            + usize::from(referenced.is_some());
        prop_assert_eq!(shares.len(), expected);
        prop_assert_eq!(shares.len(), CommissionCalculator::share_count(&inputs));
    }
}
