//! `SeaORM` entity definitions.

pub mod account_payable_histories;
pub mod accounts_payable;
pub mod accounts_receivable;
pub mod advance_payment_records;
pub mod brands;
pub mod collections;
pub mod commission_payment_records;
pub mod containers;
pub mod customers;
pub mod delivery_requests;
pub mod documents;
pub mod proformas;
pub mod projects;
pub mod proof_payments;
pub mod providers;
pub mod purchase_orders;
pub mod quotation_products;
pub mod quotation_stakeholders;
pub mod quotations;
pub mod sea_orm_active_enums;
pub mod users;
