//! Core business logic for Mobilia.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `currency` - Price-sheet resolution and fixed-factor conversion
//! - `commission` - Role-based commission fan-out
//! - `funding` - Receivable/payable balances and the purchase-order threshold
//! - `schedule` - Production and arrival date derivation
//! - `proforma` - Provider/brand uniqueness rules for project proformas
//! - `archive` - Document archive and the renderer contract

pub mod archive;
pub mod commission;
pub mod currency;
pub mod funding;
pub mod proforma;
pub mod schedule;
