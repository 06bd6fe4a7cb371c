//! Production and arrival date derivation for the fulfillment pipeline.

mod error;
mod service;
mod types;

#[cfg(test)]
mod props;

pub use error::ScheduleError;
pub use service::{
    ScheduleService, ARRIVAL_AFTER_ETA_DAYS, ARRIVAL_AFTER_ETD_DAYS, ARRIVAL_AFTER_PRODUCTION_DAYS,
};
pub use types::{ArrivalBasis, ArrivalInputs, ContainerStatus, PurchaseOrderStatus, StatusDates};
