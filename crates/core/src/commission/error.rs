//! Commission error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while planning commissions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommissionError {
    /// Commission percentages cannot be negative.
    #[error("Commission percentage cannot be negative: {0}")]
    NegativePercentage(Decimal),

    /// Commission percentages above 100 are a capture mistake.
    #[error("Commission percentage cannot exceed 100: {0}")]
    PercentageAboveHundred(Decimal),
}
