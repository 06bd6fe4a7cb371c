//! Currency error types.

use mobilia_shared::types::Currency;
use thiserror::Error;

/// Errors that can occur during currency operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// No conversion factor configured for the currency pair.
    ///
    /// The legacy behavior converted unmapped pairs to zero; that silently
    /// wiped balances, so an unmapped pair is now a hard error.
    #[error("No conversion factor configured for {from} to {to}")]
    MissingFactor {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// Conversion factors must be positive.
    #[error("Conversion factor for {from} to {to} must be positive")]
    NonPositiveFactor {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },
}
