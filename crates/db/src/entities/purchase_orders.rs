//! `SeaORM` Entity for the purchase_orders table.
//!
//! At most one funded purchase order exists per (payable, proforma) pair;
//! a partial unique index over the pair is the concurrency backstop behind
//! the check-then-create guard. Pre-funding PENDIENTE sketches carry no
//! proforma and stay outside the constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_payable_id: Option<Uuid>,
    pub proforma_id: Option<Uuid>,
    pub accounts_receivable_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub status: OrderStatus,
    pub quantity: Option<i32>,
    pub total: Option<Decimal>,
    /// Estimated production end, derived when the payable crosses the
    /// provider's advance condition.
    pub production_end_date: Option<Date>,
    /// Real production end, captured manually.
    pub production_real_end_date: Option<Date>,
    pub production_start_date: Option<Date>,
    /// Estimated warehouse arrival.
    pub arrival_date: Option<Date>,
    pub collection_id: Option<Uuid>,
    pub is_paid: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts_payable::Entity",
        from = "Column::AccountPayableId",
        to = "super::accounts_payable::Column::Id"
    )]
    AccountsPayable,
    #[sea_orm(
        belongs_to = "super::proformas::Entity",
        from = "Column::ProformaId",
        to = "super::proformas::Column::Id"
    )]
    Proformas,
    #[sea_orm(
        belongs_to = "super::collections::Entity",
        from = "Column::CollectionId",
        to = "super::collections::Column::Id"
    )]
    Collections,
}

impl Related<super::accounts_payable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountsPayable.def()
    }
}

impl Related<super::proformas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proformas.def()
    }
}

impl Related<super::collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
