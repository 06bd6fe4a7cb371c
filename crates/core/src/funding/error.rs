//! Funding error types.

use thiserror::Error;

/// Errors raised by the funding rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FundingError {
    /// A record already marked as paid is immutable.
    #[error("The record was already settled and cannot be modified")]
    AlreadySettled,

    /// Payment amounts must be positive.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Sales deviations must be positive.
    #[error("Sales deviation must be positive")]
    NonPositiveDeviation,
}
