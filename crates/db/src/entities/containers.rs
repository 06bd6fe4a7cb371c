//! `SeaORM` Entity for the containers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ContainerStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "containers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub container_number: String,
    pub status: ContainerStatus,
    /// Customs clearance number.
    pub pedimento: Option<String>,
    pub etd_date: Option<Date>,
    pub eta_date: Option<Date>,
    /// Stamped when the container goes in transit.
    pub arrival_date: Option<DateTimeWithTimeZone>,
    /// Stamped when the container is delivered.
    pub shipping_date: Option<DateTimeWithTimeZone>,
    /// ETA/ETD-derived warehouse arrival estimate.
    pub arrival_date_warehouse: Option<Date>,
    pub gross_weight: Option<Decimal>,
    pub number_boxes: Option<i32>,
    pub measures: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collections::Entity")]
    Collections,
}

impl Related<super::collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
