//! `SeaORM` Entity for the quotation_stakeholders table.
//!
//! Project managers and designers assigned to a quotation, each with their
//! commission classification splits stored as JSON
//! (`Vec<mobilia_core::commission::PercentageSplit>`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CommissionRoleColumn;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_stakeholders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quotation_id: Uuid,
    pub user_id: Uuid,
    /// PROJECT_MANAGER or PROYECTISTA.
    pub role: CommissionRoleColumn,
    /// Classification splits (`Vec<PercentageSplit>`).
    pub splits: Json,
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
