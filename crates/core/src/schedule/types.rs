//! Schedule domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Purchase-order lifecycle.
///
/// `Pendiente` is the pre-funding state for orders sketched at project
/// creation; funded orders start at `Nueva` and then move through
/// production, collection, and transit to delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    /// Sketched before the funding threshold was crossed.
    #[serde(rename = "PENDIENTE")]
    Pendiente,
    /// Funded and awaiting provider confirmation.
    #[serde(rename = "NUEVA")]
    Nueva,
    /// In production with the provider.
    #[serde(rename = "EN_PRODUCCION")]
    EnProduccion,
    /// Ready to be collected from the provider.
    #[serde(rename = "EN_RECOLECCION")]
    EnRecoleccion,
    /// On the water.
    #[serde(rename = "EN_TRANSITO")]
    EnTransito,
    /// Delivered.
    #[serde(rename = "ENTREGADO")]
    Entregado,
}

/// Shipping-container lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerStatus {
    /// Being consolidated at origin.
    #[serde(rename = "EN_CONSOLIDACION")]
    EnConsolidacion,
    /// On the water.
    #[serde(rename = "EN_TRANSITO")]
    EnTransito,
    /// Delivered to the warehouse.
    #[serde(rename = "ENTREGADO")]
    Entregado,
}

/// Date inputs for the arrival-date derivation, in priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrivalInputs {
    /// Container's estimated time of arrival.
    pub eta: Option<NaiveDate>,
    /// Container's estimated time of departure.
    pub etd: Option<NaiveDate>,
    /// Purchase order's captured real production end.
    pub production_real_end: Option<NaiveDate>,
    /// Purchase order's computed production end.
    pub production_end: Option<NaiveDate>,
}

/// Which rule produced an arrival date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalBasis {
    /// Container ETA + 10 days.
    EtaPlusTen,
    /// Container ETD + 31 days.
    EtdPlusThirtyOne,
    /// Real production end + 53 days.
    RealEndPlusFiftyThree,
    /// Planned production end + 53 days.
    PlannedEndPlusFiftyThree,
}

/// Timestamps stamped on a container by a status transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusDates {
    /// Arrival timestamp, stamped when the container goes in transit.
    pub arrival_date: Option<DateTime<Utc>>,
    /// Shipping timestamp, stamped when the container is delivered.
    pub shipping_date: Option<DateTime<Utc>>,
}
