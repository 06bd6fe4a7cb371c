//! `SeaORM` Entity for the commission_payment_records table.
//!
//! One immutable row per (project, beneficiary, role) share.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CommissionRoleColumn;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_payment_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    /// Registered beneficiary; null for named externals.
    pub user_id: Option<Uuid>,
    /// External beneficiary name (architects are often not users).
    pub user_name: Option<String>,
    pub role: CommissionRoleColumn,
    pub commission_percentage: Decimal,
    pub commission_amount: Decimal,
    pub project_total: Decimal,
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
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
