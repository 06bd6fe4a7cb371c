//! `SeaORM` Entity for the quotations table.
//!
//! Monetary figures live in `price_sheet`, a JSON column holding the three
//! parallel per-currency price sets plus the authoritative selector
//! (deserialized as `mobilia_core::currency::PriceSheet`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub branch: Option<String>,
    /// Three parallel price sets keyed by currency plus the selector.
    pub price_sheet: Json,
    pub percentage_iva: Option<Decimal>,
    /// Whether receivables/payables split per settlement currency.
    pub is_fractionate: bool,
    pub fractional_eur: bool,
    pub fractional_usd: bool,
    pub fractional_mxn: bool,
    pub is_architect: bool,
    pub architect_name: Option<String>,
    pub commission_percentage_architect: Option<Decimal>,
    pub is_referenced_customer: bool,
    pub reference_customer_id: Option<Uuid>,
    pub commission_percentage_referenced_customer: Option<Decimal>,
    pub is_project_manager: bool,
    pub is_designer: bool,
    pub main_project_manager_id: Option<Uuid>,
    /// Classification splits credited to the main project manager when an
    /// architect is involved (`Vec<PercentageSplit>`).
    pub main_pm_classification_splits: Json,
    pub showroom_manager_id: Option<Uuid>,
    pub closing_date: Option<Date>,
    pub is_draft: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The fractionated settlement currencies selected on the quotation.
    #[must_use]
    pub fn fractional_currencies(&self) -> Vec<CurrencyCode> {
        let mut currencies = Vec::new();
        if self.fractional_eur {
            currencies.push(CurrencyCode::Eur);
        }
        if self.fractional_usd {
            currencies.push(CurrencyCode::Usd);
        }
        if self.fractional_mxn {
            currencies.push(CurrencyCode::Mxn);
        }
        currencies
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quotation_products::Entity")]
    QuotationProducts,
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
}

impl Related<super::quotation_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationProducts.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
