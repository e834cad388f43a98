//! Configuration loading for the market service
//!
//! Supports JSON configuration files for:
//! - Round timing (period and the three phase delays)
//! - Clearing algorithm selection
//! - Simulated participants with their offer curves and offer mode

use gridmarket_core::{MarketName, Point, PolyLine, Side};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::participant::OfferMode;

/// Root configuration for the market service
///
/// All delays are in seconds. Within one `market_period` the director waits
/// `reservation_delay` before requesting reservations, keeps reservations open
/// for `offer_delay`, then keeps offers open for `clear_delay` before clearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketServiceConfig {
    #[serde(default = "default_market_period")]
    pub market_period: u64,

    #[serde(default)]
    pub reservation_delay: u64,

    #[serde(default = "default_phase_delay")]
    pub offer_delay: u64,

    #[serde(default = "default_phase_delay")]
    pub clear_delay: u64,

    #[serde(default = "default_clearing_algorithm")]
    pub clearing_algorithm: String,

    /// Capacity of the market event bus
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    #[serde(default)]
    pub participants: Vec<ParticipantConfig>,
}

fn default_market_period() -> u64 {
    300
}

fn default_phase_delay() -> u64 {
    120
}

fn default_clearing_algorithm() -> String {
    "curve-intersection".to_string()
}

fn default_event_capacity() -> usize {
    1024
}

impl Default for MarketServiceConfig {
    fn default() -> Self {
        Self {
            market_period: default_market_period(),
            reservation_delay: 0,
            offer_delay: default_phase_delay(),
            clear_delay: default_phase_delay(),
            clearing_algorithm: default_clearing_algorithm(),
            event_capacity: default_event_capacity(),
            participants: Vec::new(),
        }
    }
}

impl MarketServiceConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the round phases fit inside one market period
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market_period == 0 {
            return Err(ConfigError::Invalid(
                "market_period must be positive".to_string(),
            ));
        }

        if self.offer_delay == 0 || self.clear_delay == 0 {
            return Err(ConfigError::Invalid(
                "offer_delay and clear_delay must be positive".to_string(),
            ));
        }

        let phases = self.reservation_delay + self.offer_delay + self.clear_delay;
        if phases > self.market_period {
            return Err(ConfigError::Invalid(format!(
                "reservation_delay + offer_delay + clear_delay ({}) exceeds market_period ({})",
                phases, self.market_period
            )));
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn market_period(&self) -> Duration {
        Duration::from_secs(self.market_period)
    }

    pub fn reservation_delay(&self) -> Duration {
        Duration::from_secs(self.reservation_delay)
    }

    pub fn offer_delay(&self) -> Duration {
        Duration::from_secs(self.offer_delay)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_secs(self.clear_delay)
    }
}

/// A simulated participant and the curve it offers every round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub identity: String,
    pub market_name: MarketName,
    pub side: Side,
    pub curve: Vec<Point>,
    #[serde(default)]
    pub offer_mode: OfferMode,
}

impl ParticipantConfig {
    pub fn curve(&self) -> PolyLine {
        PolyLine::from_points(self.curve.iter().copied())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
