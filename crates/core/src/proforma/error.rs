//! Proforma error types.

use thiserror::Error;

/// Errors raised by the proforma rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProformaError {
    /// A proforma already exists for the (project, provider, brand) triple.
    #[error("A proforma already exists for this provider and brand on the project")]
    DuplicateProviderBrand,

    /// A proforma cannot be registered without its supporting document.
    #[error("A proforma document must be attached")]
    MissingDocument,

    /// No quotation products match the proforma's provider and brand.
    #[error("No quotation products match the proforma's provider and brand")]
    NoMatchingProducts,
}
