//! `SeaORM` Entity for the accounts_payable table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts_payable")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The proforma this payable tracks. Null only on legacy consolidated
    /// payables opened at project creation.
    pub proforma_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub currency: CurrencyCode,
    pub total: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
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
    #[sea_orm(has_many = "super::account_payable_histories::Entity")]
    AccountPayableHistories,
    #[sea_orm(has_many = "super::purchase_orders::Entity")]
    PurchaseOrders,
}

impl Related<super::proformas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proformas.def()
    }
}

impl Related<super::account_payable_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountPayableHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
