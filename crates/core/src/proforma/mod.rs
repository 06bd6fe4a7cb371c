//! Proforma rules: provider/brand uniqueness per project and receivable
//! matching for the immediate funding check.

mod error;
mod service;
mod types;

pub use error::ProformaError;
pub use service::ProformaService;
pub use types::ReceivableFacts;
