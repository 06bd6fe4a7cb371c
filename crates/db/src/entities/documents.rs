//! `SeaORM` Entity for the documents table.
//!
//! Stored paperwork: proforma PDFs, payment vouchers, rendered quotes and
//! receipts. Exactly one owner column is set per row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_url: String,
    pub name: String,
    pub extension: Option<String>,
    pub proforma_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub advance_payment_record_id: Option<Uuid>,
    pub account_payable_history_id: Option<Uuid>,
    pub container_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proformas::Entity",
        from = "Column::ProformaId",
        to = "super::proformas::Column::Id"
    )]
    Proformas,
}

impl Related<super::proformas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proformas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
