//! `SeaORM` Entity for the account_payable_histories table.
//!
//! A discrete payment toward a payable; settled rows are immutable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_payable_histories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_payable_id: Uuid,
    pub provider_id: Option<Uuid>,
    /// Amount in the currency the payment was made with.
    pub amount: Decimal,
    pub currency: CurrencyCode,
    /// Amount converted into the proforma's currency, fixed at settlement.
    pub converted_amount: Option<Decimal>,
    pub payment_date: Option<Date>,
    pub status: PaymentStatus,
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
}

impl Related<super::accounts_payable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountsPayable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
