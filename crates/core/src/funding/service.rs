//! Funding rules: balance arithmetic, the advance threshold, and the
//! at-most-one purchase-order guard.
//!
//! This service contains pure business logic with no database dependencies.
//! The repositories apply its decisions inside a single transaction, with a
//! uniqueness constraint as the concurrency backstop.

use rust_decimal::Decimal;

use super::error::FundingError;
use super::types::{
    CollectedAudience, FundingStatus, OrderDecision, PayableState, ProductKind, ReceivableState,
    SettlementStatus,
};
use crate::currency::CurrencyService;

/// Funding service.
pub struct FundingService;

impl FundingService {
    /// Validates that a payment record can still be modified.
    ///
    /// # Errors
    ///
    /// Returns `FundingError::AlreadySettled` once the record is `PAGADO`.
    pub fn guard_editable(status: SettlementStatus) -> Result<(), FundingError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(FundingError::AlreadySettled)
        }
    }

    /// Records a sales deviation against a receivable, raising the total the
    /// balance is measured against.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive deviations.
    pub fn record_sales_deviation(
        state: ReceivableState,
        deviation: Decimal,
    ) -> Result<ReceivableState, FundingError> {
        if deviation <= Decimal::ZERO {
            return Err(FundingError::NonPositiveDeviation);
        }
        let updated_total = CurrencyService::round_money(state.total_sale + deviation);
        let next = ReceivableState {
            updated_total,
            balance: CurrencyService::round_money(
                state.total_sale.max(updated_total) - state.total_paid,
            ),
            ..state
        };
        Ok(next)
    }

    /// Applies a settled collection to a receivable.
    ///
    /// The amount must already be converted into the receivable's currency.
    /// `total_paid` strictly increases; the balance is recomputed as
    /// `effective_total - total_paid` so it can only go negative when the
    /// customer genuinely overpays.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts.
    pub fn apply_collection(
        state: ReceivableState,
        converted_amount: Decimal,
    ) -> Result<ReceivableState, FundingError> {
        if converted_amount <= Decimal::ZERO {
            return Err(FundingError::NonPositiveAmount);
        }
        let total_paid = CurrencyService::round_money(state.total_paid + converted_amount);
        Ok(ReceivableState {
            total_paid,
            balance: CurrencyService::round_money(state.effective_total() - total_paid),
            ..state
        })
    }

    /// Applies a settled payment to a payable.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts.
    pub fn apply_payment(
        state: PayableState,
        converted_amount: Decimal,
    ) -> Result<PayableState, FundingError> {
        if converted_amount <= Decimal::ZERO {
            return Err(FundingError::NonPositiveAmount);
        }
        let total_paid = CurrencyService::round_money(state.total_paid + converted_amount);
        Ok(PayableState {
            total: state.total,
            total_paid,
            balance: CurrencyService::round_money(state.total - total_paid),
        })
    }

    /// Derives the funding status from the running totals.
    #[must_use]
    pub fn status(total_paid: Decimal, effective_total: Decimal) -> FundingStatus {
        if total_paid <= Decimal::ZERO {
            FundingStatus::Unfunded
        } else if total_paid < effective_total {
            FundingStatus::Partial
        } else {
            FundingStatus::Funded
        }
    }

    /// Whether the advance threshold has been collected.
    ///
    /// The threshold is the quotation's advance figure in the matching
    /// currency; a quotation without one never triggers purchasing.
    #[must_use]
    pub fn threshold_met(total_paid: Decimal, advance: Option<Decimal>) -> bool {
        match advance {
            Some(advance) if advance > Decimal::ZERO => total_paid >= advance,
            _ => false,
        }
    }

    /// The purchase-order creation guard: at most one order per
    /// (payable, proforma) pair.
    #[must_use]
    pub fn decide_order(has_payable: bool, has_order: bool) -> OrderDecision {
        match (has_payable, has_order) {
            (false, _) => OrderDecision::NoPayable,
            (true, true) => OrderDecision::AlreadyOrdered,
            (true, false) => OrderDecision::CreateOrder,
        }
    }

    /// Whether the receivable has been collected in full.
    #[must_use]
    pub fn is_fully_collected(state: &ReceivableState) -> bool {
        state.total_paid >= state.effective_total()
    }

    /// Whether the payable satisfies the provider's advance condition, which
    /// releases production scheduling. Providers without a condition require
    /// full payment.
    #[must_use]
    pub fn production_ready(
        total_paid: Decimal,
        total: Decimal,
        advance_condition_percentage: Option<Decimal>,
    ) -> bool {
        if total <= Decimal::ZERO {
            return false;
        }
        let condition = advance_condition_percentage.unwrap_or(Decimal::ONE_HUNDRED);
        let paid_percentage = total_paid / total * Decimal::ONE_HUNDRED;
        paid_percentage >= condition
    }

    /// Who to notify once a project is fully collected.
    #[must_use]
    pub fn collected_audience(kind: ProductKind) -> CollectedAudience {
        match kind {
            ProductKind::Stock => CollectedAudience::Logistics,
            ProductKind::SpecialOrder => CollectedAudience::MainProjectManager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_receivable() {
        let state = ReceivableState::open(dec!(10000));
        assert_eq!(state.total_paid, dec!(0));
        assert_eq!(state.balance, dec!(10000));
        assert_eq!(state.effective_total(), dec!(10000));
    }

    #[test]
    fn test_apply_collection_updates_balance() {
        let state = ReceivableState::open(dec!(10000));
        let state = FundingService::apply_collection(state, dec!(3000)).unwrap();
        assert_eq!(state.total_paid, dec!(3000));
        assert_eq!(state.balance, dec!(7000));
    }

    #[test]
    fn test_collections_accumulate() {
        let mut state = ReceivableState::open(dec!(10000));
        for amount in [dec!(2500.55), dec!(2500.55), dec!(4998.90)] {
            state = FundingService::apply_collection(state, amount).unwrap();
        }
        assert_eq!(state.total_paid, dec!(10000.00));
        assert_eq!(state.balance, dec!(0.00));
        assert!(FundingService::is_fully_collected(&state));
    }

    #[test]
    fn test_non_positive_collection_rejected() {
        let state = ReceivableState::open(dec!(10000));
        assert_eq!(
            FundingService::apply_collection(state, dec!(0)),
            Err(FundingError::NonPositiveAmount)
        );
        assert_eq!(
            FundingService::apply_collection(state, dec!(-5)),
            Err(FundingError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_sales_deviation_raises_effective_total() {
        let state = ReceivableState::open(dec!(10000));
        let state = FundingService::apply_collection(state, dec!(4000)).unwrap();
        let state = FundingService::record_sales_deviation(state, dec!(500)).unwrap();

        assert_eq!(state.updated_total, dec!(10500));
        assert_eq!(state.effective_total(), dec!(10500));
        assert_eq!(state.balance, dec!(6500));

        // Full collection is now measured against the raised total.
        let state = FundingService::apply_collection(state, dec!(6000)).unwrap();
        assert!(!FundingService::is_fully_collected(&state));
        let state = FundingService::apply_collection(state, dec!(500)).unwrap();
        assert!(FundingService::is_fully_collected(&state));
    }

    #[test]
    fn test_payable_payments() {
        let state = PayableState::open(dec!(4000));
        let state = FundingService::apply_payment(state, dec!(1000)).unwrap();
        assert_eq!(state.total_paid, dec!(1000));
        assert_eq!(state.balance, dec!(3000));
    }

    #[test]
    fn test_status_progression() {
        assert_eq!(
            FundingService::status(dec!(0), dec!(100)),
            FundingStatus::Unfunded
        );
        assert_eq!(
            FundingService::status(dec!(50), dec!(100)),
            FundingStatus::Partial
        );
        assert_eq!(
            FundingService::status(dec!(100), dec!(100)),
            FundingStatus::Funded
        );
        assert_eq!(
            FundingService::status(dec!(120), dec!(100)),
            FundingStatus::Funded
        );
    }

    #[test]
    fn test_threshold_met() {
        assert!(FundingService::threshold_met(dec!(3000), Some(dec!(3000))));
        assert!(FundingService::threshold_met(dec!(3500), Some(dec!(3000))));
        assert!(!FundingService::threshold_met(dec!(2999.99), Some(dec!(3000))));
        // No advance figure, or a zero one, never triggers.
        assert!(!FundingService::threshold_met(dec!(99999), None));
        assert!(!FundingService::threshold_met(dec!(99999), Some(dec!(0))));
    }

    #[test]
    fn test_decide_order_guard() {
        assert_eq!(
            FundingService::decide_order(true, false),
            OrderDecision::CreateOrder
        );
        assert_eq!(
            FundingService::decide_order(true, true),
            OrderDecision::AlreadyOrdered
        );
        assert_eq!(
            FundingService::decide_order(false, false),
            OrderDecision::NoPayable
        );
    }

    #[test]
    fn test_guard_editable() {
        assert!(FundingService::guard_editable(SettlementStatus::Pendiente).is_ok());
        assert_eq!(
            FundingService::guard_editable(SettlementStatus::Pagado),
            Err(FundingError::AlreadySettled)
        );
    }

    #[test]
    fn test_production_ready_default_is_full_payment() {
        assert!(!FundingService::production_ready(dec!(99), dec!(100), None));
        assert!(FundingService::production_ready(dec!(100), dec!(100), None));
    }

    #[test]
    fn test_production_ready_with_provider_condition() {
        // Provider releases production at 50% paid.
        assert!(FundingService::production_ready(
            dec!(2000),
            dec!(4000),
            Some(dec!(50))
        ));
        assert!(!FundingService::production_ready(
            dec!(1999.99),
            dec!(4000),
            Some(dec!(50))
        ));
    }

    #[test]
    fn test_production_ready_zero_total_never_fires() {
        assert!(!FundingService::production_ready(dec!(0), dec!(0), None));
    }

    #[test]
    fn test_eur_advance_scenario_creates_exactly_one_order() {
        use crate::currency::{PriceSet, PriceSheet};
        use mobilia_shared::types::Currency;

        // EUR-priced consolidated quotation: total 10,000, advance 3,000.
        let sheet = PriceSheet {
            eur: PriceSet {
                total: Some(dec!(10000)),
                advance: Some(dec!(3000)),
                ..PriceSet::default()
            },
            authoritative: Some(Currency::Eur),
            ..PriceSheet::default()
        };
        let advance = sheet.advance_for(Currency::Eur);

        let state = ReceivableState::open(dec!(10000));
        let state = FundingService::apply_collection(state, dec!(3000)).unwrap();

        assert_eq!(state.total_paid, dec!(3000));
        assert!(FundingService::threshold_met(state.total_paid, advance));

        // First crossing creates the order; every later event sees it.
        assert_eq!(
            FundingService::decide_order(true, false),
            OrderDecision::CreateOrder
        );
        assert_eq!(
            FundingService::decide_order(true, true),
            OrderDecision::AlreadyOrdered
        );
    }

    #[test]
    fn test_collected_audience_fork() {
        assert_eq!(
            FundingService::collected_audience(ProductKind::Stock),
            CollectedAudience::Logistics
        );
        assert_eq!(
            FundingService::collected_audience(ProductKind::SpecialOrder),
            CollectedAudience::MainProjectManager
        );
    }
}
