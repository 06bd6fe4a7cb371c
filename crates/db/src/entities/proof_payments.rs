//! `SeaORM` Entity for the proof_payments table.
//!
//! Customer payments captured while the quotation was still being
//! negotiated. At project conversion each one becomes an advance payment
//! record on the matching receivable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "proof_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quotation_id: Uuid,
    pub payment_date: Option<Date>,
    pub payment_method: Option<String>,
    /// Amount in the currency the customer paid with.
    pub amount: Decimal,
    /// Currency the customer paid with.
    pub currency: CurrencyCode,
    /// Amount converted toward the quotation's advance.
    pub converted_advance: Option<Decimal>,
    /// Parity used for the conversion.
    pub parity: Option<Decimal>,
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
}

impl Related<super::quotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
