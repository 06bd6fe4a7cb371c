//! `SeaORM` Entity for the accounts_receivable table.
//!
//! One row per (project, currency) on fractionated quotations, else one per
//! project. Balances are mutated only through the receivable repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts_receivable")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub quotation_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub currency: CurrencyCode,
    pub total_sale: Decimal,
    pub total_paid: Decimal,
    /// Raised total when a sales deviation was recorded; zero otherwise.
    pub updated_total: Decimal,
    pub balance: Decimal,
    pub is_paid: bool,
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
    #[sea_orm(has_many = "super::advance_payment_records::Entity")]
    AdvancePaymentRecords,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::advance_payment_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdvancePaymentRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
