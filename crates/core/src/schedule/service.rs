//! Date-derivation rules for production and arrival estimates.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;

use super::error::ScheduleError;
use super::types::{
    ArrivalBasis, ArrivalInputs, ContainerStatus, PurchaseOrderStatus, StatusDates,
};
use crate::funding::FundingService;

/// Days from a container's ETA to warehouse arrival.
pub const ARRIVAL_AFTER_ETA_DAYS: u64 = 10;
/// Days from a container's ETD to warehouse arrival.
pub const ARRIVAL_AFTER_ETD_DAYS: u64 = 31;
/// Days from a production end date to warehouse arrival when no container
/// context exists yet.
pub const ARRIVAL_AFTER_PRODUCTION_DAYS: u64 = 53;

/// Stateless service for schedule derivation.
pub struct ScheduleService;

impl ScheduleService {
    /// Adds business days to a date, skipping Saturdays and Sundays.
    ///
    /// Holiday calendars are out of scope; providers quote production time
    /// in working days.
    #[must_use]
    pub fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
        let mut date = start;
        let mut remaining = days;
        while remaining > 0 {
            date = date + Days::new(1);
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                remaining -= 1;
            }
        }
        date
    }

    /// The production end estimate: today plus the brand's production time
    /// in business days.
    #[must_use]
    pub fn production_end_date(today: NaiveDate, production_time_days: u32) -> NaiveDate {
        Self::add_business_days(today, production_time_days)
    }

    /// Derives an arrival date, evaluating the inputs in strict priority
    /// order and short-circuiting at the first available one:
    ///
    /// 1. container ETA + 10 days
    /// 2. container ETD + 31 days
    /// 3. real production end + 53 days
    /// 4. planned production end + 53 days
    /// 5. no arrival date
    #[must_use]
    pub fn arrival_date(inputs: &ArrivalInputs) -> Option<(NaiveDate, ArrivalBasis)> {
        if let Some(eta) = inputs.eta {
            return Some((eta + Days::new(ARRIVAL_AFTER_ETA_DAYS), ArrivalBasis::EtaPlusTen));
        }
        if let Some(etd) = inputs.etd {
            return Some((
                etd + Days::new(ARRIVAL_AFTER_ETD_DAYS),
                ArrivalBasis::EtdPlusThirtyOne,
            ));
        }
        if let Some(real_end) = inputs.production_real_end {
            return Some((
                real_end + Days::new(ARRIVAL_AFTER_PRODUCTION_DAYS),
                ArrivalBasis::RealEndPlusFiftyThree,
            ));
        }
        if let Some(planned_end) = inputs.production_end {
            return Some((
                planned_end + Days::new(ARRIVAL_AFTER_PRODUCTION_DAYS),
                ArrivalBasis::PlannedEndPlusFiftyThree,
            ));
        }
        None
    }

    /// The container's warehouse-arrival estimate from its own voyage dates
    /// only (ETA + 10 or ETD + 31). This is the rule that writes the
    /// container's `arrival_date_warehouse`; it deliberately ignores order
    /// production dates.
    #[must_use]
    pub fn warehouse_arrival(eta: Option<NaiveDate>, etd: Option<NaiveDate>) -> Option<NaiveDate> {
        Self::arrival_date(&ArrivalInputs {
            eta,
            etd,
            ..ArrivalInputs::default()
        })
        .map(|(date, _)| date)
    }

    /// Timestamps stamped by a container status change: going in transit
    /// stamps the arrival date, delivery stamps the shipping date.
    ///
    /// This is the legacy status-driven rule. It coexists with
    /// `warehouse_arrival`, which only ever writes the warehouse estimate,
    /// so neither path overwrites the other.
    #[must_use]
    pub fn status_dates(status: ContainerStatus, now: DateTime<Utc>) -> StatusDates {
        match status {
            ContainerStatus::EnTransito => StatusDates {
                arrival_date: Some(now),
                shipping_date: None,
            },
            ContainerStatus::Entregado => StatusDates {
                arrival_date: None,
                shipping_date: Some(now),
            },
            ContainerStatus::EnConsolidacion => StatusDates::default(),
        }
    }

    /// Validates a purchase-order status transition.
    ///
    /// Valid transitions:
    /// - Pendiente → Nueva (funding threshold crossed)
    /// - Nueva → EnProduccion
    /// - EnProduccion → EnRecoleccion
    /// - EnRecoleccion → EnTransito
    /// - EnTransito → Entregado
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidTransition` otherwise.
    pub fn transition_order(
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    ) -> Result<PurchaseOrderStatus, ScheduleError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(ScheduleError::InvalidTransition { from, to })
        }
    }

    /// Check if a purchase-order status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: PurchaseOrderStatus, to: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus as S;
        matches!(
            (from, to),
            (S::Pendiente, S::Nueva)
                | (S::Nueva, S::EnProduccion)
                | (S::EnProduccion, S::EnRecoleccion)
                | (S::EnRecoleccion, S::EnTransito)
                | (S::EnTransito, S::Entregado)
        )
    }

    /// Validates a container status transition.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidContainerTransition` otherwise.
    pub fn transition_container(
        from: ContainerStatus,
        to: ContainerStatus,
    ) -> Result<ContainerStatus, ScheduleError> {
        use ContainerStatus as S;
        if matches!(
            (from, to),
            (S::EnConsolidacion, S::EnTransito) | (S::EnTransito, S::Entregado)
        ) {
            Ok(to)
        } else {
            Err(ScheduleError::InvalidContainerTransition { from, to })
        }
    }

    /// The daily sweep rule: an order in production whose (real, else
    /// planned) production end has passed advances to collection once its
    /// payable is settled in full.
    #[must_use]
    pub fn ready_for_collection(
        status: PurchaseOrderStatus,
        production_end: Option<NaiveDate>,
        production_real_end: Option<NaiveDate>,
        today: NaiveDate,
        payable_total_paid: Decimal,
        payable_total: Decimal,
    ) -> bool {
        if status != PurchaseOrderStatus::EnProduccion {
            return false;
        }
        let end = production_real_end.or(production_end);
        let Some(end) = end else {
            return false;
        };
        end <= today && FundingService::status(payable_total_paid, payable_total).is_funded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_business_days_skips_weekend() {
        // Friday + 1 business day = Monday
        assert_eq!(
            ScheduleService::add_business_days(date(2024, 1, 5), 1),
            date(2024, 1, 8)
        );
        // Wednesday + 5 business days = next Wednesday
        assert_eq!(
            ScheduleService::add_business_days(date(2024, 1, 3), 5),
            date(2024, 1, 10)
        );
        // Zero days is the identity even on a weekend.
        assert_eq!(
            ScheduleService::add_business_days(date(2024, 1, 6), 0),
            date(2024, 1, 6)
        );
    }

    #[test]
    fn test_production_end_date_uses_business_days() {
        // 2024-01-05 is a Friday; 10 working days later is 2024-01-19.
        assert_eq!(
            ScheduleService::production_end_date(date(2024, 1, 5), 10),
            date(2024, 1, 19)
        );
    }

    #[test]
    fn test_arrival_prefers_eta_over_everything() {
        let inputs = ArrivalInputs {
            eta: Some(date(2024, 3, 1)),
            etd: Some(date(2024, 2, 1)),
            production_real_end: Some(date(2024, 1, 10)),
            production_end: Some(date(2024, 1, 5)),
        };
        let (arrival, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        assert_eq!(arrival, date(2024, 3, 11));
        assert_eq!(basis, ArrivalBasis::EtaPlusTen);
    }

    #[test]
    fn test_arrival_falls_back_to_etd() {
        let inputs = ArrivalInputs {
            etd: Some(date(2024, 2, 1)),
            production_real_end: Some(date(2024, 1, 10)),
            ..ArrivalInputs::default()
        };
        let (arrival, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        assert_eq!(arrival, date(2024, 3, 3));
        assert_eq!(basis, ArrivalBasis::EtdPlusThirtyOne);
    }

    #[test]
    fn test_arrival_from_real_production_end() {
        // 2024-01-10 + 53 days = 2024-03-03
        let inputs = ArrivalInputs {
            production_real_end: Some(date(2024, 1, 10)),
            production_end: Some(date(2024, 1, 5)),
            ..ArrivalInputs::default()
        };
        let (arrival, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        assert_eq!(arrival, date(2024, 3, 3));
        assert_eq!(basis, ArrivalBasis::RealEndPlusFiftyThree);
    }

    #[rstest::rstest]
    #[case(ArrivalInputs { eta: Some(date(2024, 3, 1)), ..ArrivalInputs::default() }, date(2024, 3, 11))]
    #[case(ArrivalInputs { etd: Some(date(2024, 2, 1)), ..ArrivalInputs::default() }, date(2024, 3, 3))]
    #[case(ArrivalInputs { production_real_end: Some(date(2024, 1, 10)), ..ArrivalInputs::default() }, date(2024, 3, 3))]
    fn test_arrival_spans(#[case] inputs: ArrivalInputs, #[case] expected: NaiveDate) {
        let (arrival, _) = ScheduleService::arrival_date(&inputs).unwrap();
        assert_eq!(arrival, expected);
    }

    #[test]
    fn test_arrival_from_planned_production_end() {
        let inputs = ArrivalInputs {
            production_end: Some(date(2024, 1, 5)),
            ..ArrivalInputs::default()
        };
        let (arrival, basis) = ScheduleService::arrival_date(&inputs).unwrap();
        assert_eq!(arrival, date(2024, 2, 27));
        assert_eq!(basis, ArrivalBasis::PlannedEndPlusFiftyThree);
    }

    #[test]
    fn test_no_inputs_no_arrival() {
        assert!(ScheduleService::arrival_date(&ArrivalInputs::default()).is_none());
    }

    #[test]
    fn test_warehouse_arrival_ignores_production_dates() {
        assert_eq!(
            ScheduleService::warehouse_arrival(None, Some(date(2024, 2, 1))),
            Some(date(2024, 3, 3))
        );
        assert_eq!(ScheduleService::warehouse_arrival(None, None), None);
    }

    #[test]
    fn test_status_dates_transit_stamps_arrival_only() {
        let now = Utc::now();
        let dates = ScheduleService::status_dates(ContainerStatus::EnTransito, now);
        assert_eq!(dates.arrival_date, Some(now));
        assert_eq!(dates.shipping_date, None);
    }

    #[test]
    fn test_status_dates_delivered_stamps_shipping_only() {
        let now = Utc::now();
        let dates = ScheduleService::status_dates(ContainerStatus::Entregado, now);
        assert_eq!(dates.arrival_date, None);
        assert_eq!(dates.shipping_date, Some(now));
    }

    #[test]
    fn test_order_transitions() {
        use PurchaseOrderStatus as S;
        assert!(ScheduleService::is_valid_transition(S::Pendiente, S::Nueva));
        assert!(ScheduleService::is_valid_transition(S::Nueva, S::EnProduccion));
        assert!(ScheduleService::is_valid_transition(S::EnProduccion, S::EnRecoleccion));
        assert!(ScheduleService::is_valid_transition(S::EnRecoleccion, S::EnTransito));
        assert!(ScheduleService::is_valid_transition(S::EnTransito, S::Entregado));

        assert!(!ScheduleService::is_valid_transition(S::Pendiente, S::EnProduccion));
        assert!(!ScheduleService::is_valid_transition(S::Entregado, S::Nueva));
        assert!(!ScheduleService::is_valid_transition(S::Nueva, S::Nueva));

        assert!(matches!(
            ScheduleService::transition_order(S::Nueva, S::Entregado),
            Err(ScheduleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_container_transitions() {
        use ContainerStatus as S;
        assert!(ScheduleService::transition_container(S::EnConsolidacion, S::EnTransito).is_ok());
        assert!(ScheduleService::transition_container(S::EnTransito, S::Entregado).is_ok());
        assert!(matches!(
            ScheduleService::transition_container(S::Entregado, S::EnTransito),
            Err(ScheduleError::InvalidContainerTransition { .. })
        ));
    }

    #[test]
    fn test_ready_for_collection() {
        use PurchaseOrderStatus as S;
        let today = date(2024, 6, 1);

        // Past end date and fully paid payable.
        assert!(ScheduleService::ready_for_collection(
            S::EnProduccion,
            Some(date(2024, 5, 20)),
            None,
            today,
            dec!(4000),
            dec!(4000),
        ));

        // Real end date takes precedence over the planned one.
        assert!(!ScheduleService::ready_for_collection(
            S::EnProduccion,
            Some(date(2024, 5, 20)),
            Some(date(2024, 6, 10)),
            today,
            dec!(4000),
            dec!(4000),
        ));

        // Not yet fully paid.
        assert!(!ScheduleService::ready_for_collection(
            S::EnProduccion,
            Some(date(2024, 5, 20)),
            None,
            today,
            dec!(3999),
            dec!(4000),
        ));

        // Wrong status.
        assert!(!ScheduleService::ready_for_collection(
            S::Nueva,
            Some(date(2024, 5, 20)),
            None,
            today,
            dec!(4000),
            dec!(4000),
        ));
    }
}
