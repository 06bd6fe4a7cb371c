//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Outbound mail configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Fixed currency-conversion factors.
    #[serde(default)]
    pub fx: FxConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Outbound mail (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "no-reply@mobilia.mx".to_string()
}

fn default_from_name() -> String {
    "Mobilia".to_string()
}

/// A single fixed conversion factor between two settlement currencies.
#[derive(Debug, Clone, Deserialize)]
pub struct FxRate {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Multiplicative factor (1 `from` = `rate` `to`).
    pub rate: Decimal,
}

/// Fixed currency-conversion configuration.
///
/// The business converts between its three settlement currencies with a
/// fixed factor table, not a live exchange-rate feed. The defaults below are
/// the operational rates; deployments override them in `config/*.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FxConfig {
    /// All configured conversion factors. Identity pairs are implicit.
    #[serde(default = "default_fx_factors")]
    pub factors: Vec<FxRate>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            factors: default_fx_factors(),
        }
    }
}

fn default_fx_factors() -> Vec<FxRate> {
    fn rate(from: Currency, to: Currency, rate: Decimal) -> FxRate {
        FxRate { from, to, rate }
    }
    use Currency::{Eur, Mxn, Usd};
    vec![
        rate(Usd, Eur, Decimal::new(92, 2)),     // 0.92
        rate(Mxn, Eur, Decimal::new(5, 2)),      // 0.05
        rate(Eur, Usd, Decimal::new(109, 2)),    // 1.09
        rate(Mxn, Usd, Decimal::new(55, 3)),     // 0.055
        rate(Eur, Mxn, Decimal::new(1987, 2)),   // 19.87
        rate(Usd, Mxn, Decimal::new(1823, 2)),   // 18.23
    ]
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MOBILIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }

    #[test]
    fn test_default_fx_covers_every_ordered_pair() {
        let fx = FxConfig::default();
        for from in Currency::ALL {
            for to in Currency::ALL {
                if from == to {
                    continue;
                }
                assert!(
                    fx.factors.iter().any(|f| f.from == from && f.to == to),
                    "missing default factor {from}->{to}"
                );
            }
        }
    }

    #[test]
    fn test_default_fx_factors_are_positive() {
        for factor in FxConfig::default().factors {
            assert!(factor.rate > Decimal::ZERO);
        }
    }
}
