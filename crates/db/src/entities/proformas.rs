//! `SeaORM` Entity for the proformas table.
//!
//! A provider+brand quote attached to a project; at most one per
//! (project, provider, brand), enforced by a unique index.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "proformas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub provider_id: Uuid,
    pub brand_id: Uuid,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub proforma_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(has_many = "super::accounts_payable::Entity")]
    AccountsPayable,
    #[sea_orm(has_many = "super::quotation_products::Entity")]
    QuotationProducts,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::accounts_payable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountsPayable.def()
    }
}

impl Related<super::quotation_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
