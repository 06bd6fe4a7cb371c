//! Role-based commission fan-out for project creation.

mod error;
mod service;
mod types;

#[cfg(test)]
mod props;

pub use error::CommissionError;
pub use service::{flat_split, CommissionCalculator};
pub use types::{
    ArchitectCommission, Beneficiary, CommissionInputs, CommissionRole, CommissionShare,
    PercentageSplit, StakeholderSplits,
};
