//! # Register Configuration
//!
//! Configuration for a cashier session's register.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LANE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lane_core::{TaxRate, DEFAULT_TAX_RATE_BPS};

/// Register configuration.
///
/// ## Fields
/// All fields have sensible defaults for development. The tax rate is a
/// configuration value here precisely so no call site hard-codes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConfig {
    /// Tax rate in basis points (850 = 8.50%).
    pub tax_rate_bps: u32,

    /// Simulated card terminal delay in milliseconds.
    pub card_delay_ms: u64,

    /// Simulated mobile payment delay in milliseconds.
    pub mobile_delay_ms: u64,

    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for RegisterConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Tax: 8.50%
    /// - Card terminal: 2000ms
    /// - Mobile payment: 3000ms
    /// - Event buffer: 64 events
    fn default() -> Self {
        RegisterConfig {
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            card_delay_ms: 2000,
            mobile_delay_ms: 3000,
            event_capacity: 64,
        }
    }
}

impl RegisterConfig {
    /// Creates a RegisterConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `LANE_TAX_RATE`: Override the tax rate as a percentage (e.g., "8.5")
    /// - `LANE_CARD_DELAY_MS`: Override the card terminal delay
    /// - `LANE_MOBILE_DELAY_MS`: Override the mobile payment delay
    pub fn from_env() -> Self {
        let mut config = RegisterConfig::default();

        if let Ok(rate_str) = std::env::var("LANE_TAX_RATE") {
            if let Ok(rate) = rate_str.parse::<f64>() {
                config.tax_rate_bps = (rate * 100.0).round() as u32;
            }
        }

        if let Ok(delay) = std::env::var("LANE_CARD_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                config.card_delay_ms = ms;
            }
        }

        if let Ok(delay) = std::env::var("LANE_MOBILE_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                config.mobile_delay_ms = ms;
            }
        }

        config
    }

    /// Returns the configured tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Returns the card terminal delay as a Duration.
    #[inline]
    pub fn card_delay(&self) -> Duration {
        Duration::from_millis(self.card_delay_ms)
    }

    /// Returns the mobile payment delay as a Duration.
    #[inline]
    pub fn mobile_delay(&self) -> Duration {
        Duration::from_millis(self.mobile_delay_ms)
    }
}
