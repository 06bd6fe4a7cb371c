//! `SeaORM` Entity for the projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ProjectStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing folio: running number plus the branch initial.
    pub folio: String,
    /// Showroom reference built from the showroom manager's initial.
    pub reference: Option<String>,
    /// Running sequence backing the folio.
    pub sequence: i64,
    pub quotation_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub branch: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotations::Entity",
        from = "Column::QuotationId",
        to = "super::quotations::Column::Id"
    )]
    Quotations,
    #[sea_orm(has_many = "super::accounts_receivable::Entity")]
    AccountsReceivable,
    #[sea_orm(has_many = "super::proformas::Entity")]
    Proformas,
    #[sea_orm(has_many = "super::commission_payment_records::Entity")]
    CommissionPaymentRecords,
}

impl Related<super::quotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl Related<super::accounts_receivable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountsReceivable.def()
    }
}

impl Related<super::proformas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proformas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
