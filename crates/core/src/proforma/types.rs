//! Proforma domain types.

use mobilia_shared::types::{Currency, ReceivableId};
use rust_decimal::Decimal;

/// What the funding check needs to know about a receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivableFacts {
    /// The receivable.
    pub id: ReceivableId,
    /// Its settlement currency.
    pub currency: Currency,
    /// Sum of settled collections so far.
    pub total_paid: Decimal,
}
