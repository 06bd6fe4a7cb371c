//! `SeaORM` Entity for the advance_payment_records table.
//!
//! A discrete customer payment toward a receivable. `consecutive_id` is a
//! per-receivable running number; settled rows are immutable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "advance_payment_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub accounts_receivable_id: Uuid,
    pub project_id: Uuid,
    /// Running number scoped to the receivable.
    pub consecutive_id: i32,
    pub payment_date: Option<Date>,
    pub payment_method: Option<String>,
    /// Amount in the currency the customer paid with.
    pub amount_paid: Decimal,
    pub payment_currency: CurrencyCode,
    /// Parity applied to reach the receivable's currency.
    pub parity: Option<Decimal>,
    pub percentage_iva: Option<Decimal>,
    /// The receivable currency the payment applies to.
    pub currency_apply: CurrencyCode,
    /// Amount converted into the receivable's currency.
    pub converted_amount: Decimal,
    /// Converted amount net of IVA.
    pub subtotal_amount: Option<Decimal>,
    /// Share of the sale this payment represents, in percent.
    pub payment_percentage: Option<Decimal>,
    pub sales_deviation: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts_receivable::Entity",
        from = "Column::AccountsReceivableId",
        to = "super::accounts_receivable::Column::Id"
    )]
    AccountsReceivable,
}

impl Related<super::accounts_receivable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountsReceivable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
