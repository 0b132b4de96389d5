//! Configuration management for the order desk demo.
//!
//! Loads configuration from environment variables with sensible defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `ORDER_DESK_LOW_STOCK_THRESHOLD` | `3` |
//! | `ORDER_DESK_ALLOW_NEGATIVE_STOCK` | `false` |
//! | `ORDER_DESK_REJECT_UNKNOWN_ORDERS` | `true` |
//! | `ORDER_DESK_TOAST_CAPACITY` | `5` |
//! | `ORDER_DESK_LOG_LEVEL` | `info` |

use order_desk_runtime::DEFAULT_TOAST_CAPACITY;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable for [`DemoConfig::low_stock_threshold`]
pub const LOW_STOCK_THRESHOLD_VAR: &str = "ORDER_DESK_LOW_STOCK_THRESHOLD";
/// Environment variable for [`DemoConfig::allow_negative_stock`]
pub const ALLOW_NEGATIVE_STOCK_VAR: &str = "ORDER_DESK_ALLOW_NEGATIVE_STOCK";
/// Environment variable for [`DemoConfig::reject_unknown_orders`]
pub const REJECT_UNKNOWN_ORDERS_VAR: &str = "ORDER_DESK_REJECT_UNKNOWN_ORDERS";
/// Environment variable for [`DemoConfig::toast_capacity`]
pub const TOAST_CAPACITY_VAR: &str = "ORDER_DESK_TOAST_CAPACITY";
/// Environment variable for [`DemoConfig::log_level`]
pub const LOG_LEVEL_VAR: &str = "ORDER_DESK_LOG_LEVEL";

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },
    /// Parsed values are inconsistent
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Demo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Stock at or below this level counts as low
    pub low_stock_threshold: i64,
    /// Let stock adjustments drive stock below zero (backorders)
    pub allow_negative_stock: bool,
    /// Report unknown order ids instead of ignoring them
    pub reject_unknown_orders: bool,
    /// Toasts kept visible by the notification sink
    pub toast_capacity: usize,
    /// Default `tracing` filter for the binary
    pub log_level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 3,
            allow_negative_stock: false,
            reject_unknown_orders: true,
            toast_capacity: DEFAULT_TOAST_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparseable value
    /// or the result fails [`DemoConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DemoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            low_stock_threshold: parse_var(&lookup, LOW_STOCK_THRESHOLD_VAR)?
                .unwrap_or(defaults.low_stock_threshold),
            allow_negative_stock: parse_flag(&lookup, ALLOW_NEGATIVE_STOCK_VAR)?
                .unwrap_or(defaults.allow_negative_stock),
            reject_unknown_orders: parse_flag(&lookup, REJECT_UNKNOWN_ORDERS_VAR)?
                .unwrap_or(defaults.reject_unknown_orders),
            toast_capacity: parse_var(&lookup, TOAST_CAPACITY_VAR)?
                .unwrap_or(defaults.toast_capacity),
            log_level: lookup(LOG_LEVEL_VAR)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for inconsistent values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero toast capacity or a
    /// negative low-stock threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toast_capacity == 0 {
            return Err(ConfigError::Validation(
                "toast capacity must be at least 1".to_string(),
            ));
        }
        if self.low_stock_threshold < 0 {
            return Err(ConfigError::Validation(
                "low stock threshold cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the low-stock threshold
    #[must_use]
    pub const fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Allow or forbid negative stock
    #[must_use]
    pub const fn with_negative_stock(mut self, allow: bool) -> Self {
        self.allow_negative_stock = allow;
        self
    }

    /// Report or ignore unknown order ids
    #[must_use]
    pub const fn with_reject_unknown_orders(mut self, reject: bool) -> Self {
        self.reject_unknown_orders = reject;
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                value: raw.clone(),
            }),
        })
        .transpose()
}
