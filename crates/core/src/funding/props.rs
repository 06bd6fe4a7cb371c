//! Property tests for the funding rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::FundingService;
use super::types::{OrderDecision, ReceivableState};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of settled collections, `total_paid` equals the sum
    /// of amounts and `balance = effective_total - total_paid`, both at two
    /// decimal places.
    #[test]
    fn prop_balance_invariant_holds_across_sequences(
        total_sale in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 1..12),
    ) {
        let mut state = ReceivableState::open(total_sale);
        let mut expected_paid = Decimal::ZERO;

        for amount in &amounts {
            let before = state.total_paid;
            state = FundingService::apply_collection(state, *amount).unwrap();
            expected_paid += amount;

            // total_paid strictly increases with every settled payment.
            prop_assert!(state.total_paid > before);
            prop_assert_eq!(state.total_paid, expected_paid);
            prop_assert_eq!(state.balance, state.effective_total() - state.total_paid);
        }
    }

    /// A sales deviation never lowers the effective total, and the balance
    /// invariant survives interleaved deviations and collections.
    #[test]
    fn prop_deviation_only_raises_effective_total(
        total_sale in amount_strategy(),
        deviation in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 0..6),
    ) {
        let mut state = ReceivableState::open(total_sale);
        for amount in &amounts {
            state = FundingService::apply_collection(state, *amount).unwrap();
        }

        let before = state.effective_total();
        state = FundingService::record_sales_deviation(state, deviation).unwrap();
        prop_assert!(state.effective_total() >= before);
        prop_assert_eq!(state.balance, state.effective_total() - state.total_paid);
    }

    /// The order guard yields `CreateOrder` exactly once per pair when the
    /// caller threads the existing-order flag, regardless of how many
    /// payment events fire.
    #[test]
    fn prop_at_most_one_order_per_pair(events in prop::collection::vec(any::<bool>(), 1..30)) {
        let mut has_order = false;
        let mut created = 0u32;

        for has_payable in events {
            match FundingService::decide_order(has_payable, has_order) {
                OrderDecision::CreateOrder => {
                    created += 1;
                    has_order = true;
                }
                OrderDecision::AlreadyOrdered | OrderDecision::NoPayable => {}
            }
        }

        prop_assert!(created <= 1);
    }

    /// The threshold is monotone: once met it stays met as collections
    /// accumulate.
    #[test]
    fn prop_threshold_is_monotone(
        advance in amount_strategy(),
        amounts in prop::collection::vec(amount_strategy(), 1..10),
    ) {
        let mut state = ReceivableState::open(advance * Decimal::TEN);
        let mut met_before = false;

        for amount in amounts {
            state = FundingService::apply_collection(state, amount).unwrap();
            let met = FundingService::threshold_met(state.total_paid, Some(advance));
            prop_assert!(!met_before || met, "threshold regressed");
            met_before = met;
        }
    }
}
