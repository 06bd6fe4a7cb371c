//! Shared types, errors, and configuration for Mobilia.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - The outbound mail channel (best-effort notifications)

pub mod config;
pub mod error;
pub mod mail;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
