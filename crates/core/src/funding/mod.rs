//! Receivable/payable balance tracking and the purchase-order funding
//! threshold.

mod error;
mod service;
mod types;

#[cfg(test)]
mod props;

pub use error::FundingError;
pub use service::FundingService;
pub use types::{
    CollectedAudience, FundingStatus, OrderDecision, PayableState, ProductKind, ReceivableState,
    SettlementStatus,
};
