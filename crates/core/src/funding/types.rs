//! Funding domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How far a receivable or payable has been funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingStatus {
    /// Nothing collected yet.
    Unfunded,
    /// Partially collected.
    Partial,
    /// Fully collected.
    Funded,
}

impl FundingStatus {
    /// Returns true when fully funded.
    #[must_use]
    pub fn is_funded(self) -> bool {
        matches!(self, Self::Funded)
    }
}

/// Settlement status of a discrete payment record.
///
/// `Pagado` is terminal: settled records cannot be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Awaiting settlement.
    #[serde(rename = "PENDIENTE")]
    Pendiente,
    /// Settled; immutable from here on.
    #[serde(rename = "PAGADO")]
    Pagado,
}

impl SettlementStatus {
    /// Returns true if the record can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pendiente)
    }
}

/// Balance snapshot of an accounts-receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivableState {
    /// The sale total at project creation.
    pub total_sale: Decimal,
    /// Sum of settled collections.
    pub total_paid: Decimal,
    /// Raised total when a sales deviation was recorded; zero otherwise.
    pub updated_total: Decimal,
    /// Outstanding balance.
    pub balance: Decimal,
}

impl ReceivableState {
    /// Opens a receivable for a sale total.
    #[must_use]
    pub fn open(total_sale: Decimal) -> Self {
        Self {
            total_sale,
            total_paid: Decimal::ZERO,
            updated_total: Decimal::ZERO,
            balance: total_sale,
        }
    }

    /// The total the balance is measured against: the recorded deviation
    /// total when one was captured, else the original sale total.
    #[must_use]
    pub fn effective_total(&self) -> Decimal {
        self.total_sale.max(self.updated_total)
    }
}

/// Balance snapshot of an accounts-payable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableState {
    /// The amount owed to the provider.
    pub total: Decimal,
    /// Sum of settled payments.
    pub total_paid: Decimal,
    /// Outstanding balance.
    pub balance: Decimal,
}

impl PayableState {
    /// Opens a payable sized to a proforma amount.
    #[must_use]
    pub fn open(total: Decimal) -> Self {
        Self {
            total,
            total_paid: Decimal::ZERO,
            balance: total,
        }
    }
}

/// Outcome of the purchase-order creation guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDecision {
    /// Create the purchase order now.
    CreateOrder,
    /// An order already exists for this (payable, proforma) pair.
    AlreadyOrdered,
    /// The proforma has no payable yet; nothing to order against.
    NoPayable,
}

/// What kind of product a fully collected project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    /// Showroom stock; logistics coordinates the delivery.
    #[serde(rename = "STOCK")]
    Stock,
    /// Made to order with the provider.
    #[serde(rename = "PEDIDO")]
    SpecialOrder,
}

/// Who gets told that a project is fully collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectedAudience {
    /// The logistics crew (stock products move from the warehouse).
    Logistics,
    /// The main project manager (special orders need provider follow-up).
    MainProjectManager,
}
