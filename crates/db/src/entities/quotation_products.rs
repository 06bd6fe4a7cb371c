//! `SeaORM` Entity for the quotation_products table.
//!
//! The join between a quotation and a catalog product, carrying the
//! per-product pricing and the links a purchase order claims when funding
//! lands.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, ProductKindColumn, ProductStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quotation_id: Uuid,
    pub provider_id: Uuid,
    pub brand_id: Uuid,
    pub description: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub currency: CurrencyCode,
    pub price: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub status: ProductStatus,
    pub kind: ProductKindColumn,
    /// Set when a proforma claims this product.
    pub proforma_id: Option<Uuid>,
    /// Set when a purchase order claims this product.
    pub purchase_order_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotations::Entity",
        from = "Column::QuotationId",
        to = "super::quotations::Column::Id"
    )]
    Quotations,
    #[sea_orm(
        belongs_to = "super::proformas::Entity",
        from = "Column::ProformaId",
        to = "super::proformas::Column::Id"
    )]
    Proformas,
    #[sea_orm(
        belongs_to = "super::purchase_orders::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_orders::Column::Id"
    )]
    PurchaseOrders,
}

impl Related<super::quotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl Related<super::proformas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proformas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
