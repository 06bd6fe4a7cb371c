//! Schedule error types.

use thiserror::Error;

use super::types::{ContainerStatus, PurchaseOrderStatus};

/// Errors raised by the scheduling rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Invalid purchase-order status transition.
    #[error("Invalid purchase order transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: PurchaseOrderStatus,
        /// Requested status.
        to: PurchaseOrderStatus,
    },

    /// Invalid container status transition.
    #[error("Invalid container transition from {from:?} to {to:?}")]
    InvalidContainerTransition {
        /// Current status.
        from: ContainerStatus,
        /// Requested status.
        to: ContainerStatus,
    },
}
