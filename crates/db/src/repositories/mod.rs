//! Repository abstractions for data access.
//!
//! Repositories provide named query methods and transactional orchestration,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Multi-step financial writes run inside a single database
//! transaction; best-effort side channels (mail, rendered paperwork) run
//! after commit.

pub mod container;
pub mod delivery;
pub mod directory;
pub mod payable;
pub mod proforma;
pub mod project;
pub mod purchase_order;
pub mod receivable;

pub use container::{ContainerError, ContainerRepository, UpdateContainerInput};
pub use delivery::{DeliveryError, DeliveryNotice, DeliveryRepository};
pub use directory::UserDirectory;
pub use payable::{PayableError, PayableRepository, RecordPaymentInput};
pub use proforma::{ProformaError as ProformaRepoError, ProformaRepository, RegisterProformaInput};
pub use project::{CreateProjectInput, ProjectCreation, ProjectError, ProjectRepository};
pub use purchase_order::{PendingCollection, PurchaseOrderError, PurchaseOrderRepository};
pub use receivable::{
    CreateCollectionInput, ReceivableError, ReceivableRepository, SettleCollectionInput,
    SettlementOutcome,
};

use mobilia_core::currency::PriceSheet;

use crate::entities::quotations;

/// A document reference to attach to an entity.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Where the file lives.
    pub file_url: String,
    /// Display name.
    pub name: String,
    /// File extension.
    pub extension: Option<String>,
}

/// Decodes a quotation's price sheet from its JSON column.
pub(crate) fn decode_price_sheet(quotation: &quotations::Model) -> Result<PriceSheet, String> {
    serde_json::from_value(quotation.price_sheet.clone())
        .map_err(|e| format!("malformed price sheet on quotation {}: {e}", quotation.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilia_core::currency::PriceSheet;
    use sea_orm::entity::prelude::*;

    fn quotation_with_sheet(sheet: serde_json::Value) -> quotations::Model {
        quotations::Model {
            id: Uuid::now_v7(),
            customer_id: None,
            branch: None,
            price_sheet: sheet,
            percentage_iva: None,
            is_fractionate: false,
            fractional_eur: false,
            fractional_usd: false,
            fractional_mxn: false,
            is_architect: false,
            architect_name: None,
            commission_percentage_architect: None,
            is_referenced_customer: false,
            reference_customer_id: None,
            commission_percentage_referenced_customer: None,
            is_project_manager: false,
            is_designer: false,
            main_project_manager_id: None,
            main_pm_classification_splits: serde_json::json!([]),
            showroom_manager_id: None,
            closing_date: None,
            is_draft: false,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_decode_default_sheet() {
        let sheet = serde_json::to_value(PriceSheet::default()).unwrap();
        let decoded = decode_price_sheet(&quotation_with_sheet(sheet)).unwrap();
        assert!(decoded.resolve().is_none());
    }

    #[test]
    fn test_decode_empty_object_as_unpriced_sheet() {
        // Freshly captured quotations carry the column default `{}`.
        let decoded = decode_price_sheet(&quotation_with_sheet(serde_json::json!({}))).unwrap();
        assert!(decoded.resolve().is_none());
        assert!(decoded.total().is_none());
    }

    #[test]
    fn test_decode_malformed_sheet_is_an_error() {
        let decoded = decode_price_sheet(&quotation_with_sheet(serde_json::json!("nonsense")));
        assert!(decoded.is_err());
    }
}
