//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the database path can be
//! overridden with `REFEREE_DATABASE`.
//!
//! # Example
//!
//! ```no_run
//! use referee::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use super::arbitrage::{ArbitrageConfig, ModeConfig};
use super::logging::LoggingConfig;
use super::reconnection::ReconnectionConfig;
use super::source::{SourceConfig, SourceKind};
use crate::application::engine::{DetectionMode, EngineSettings};
use crate::domain::{
    cost::CostModel,
    fee::FeeSchedule,
    id::{InstrumentId, SourceId},
};
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "REFEREE_DATABASE";

/// An enabled source with its resolved adapter kind.
#[derive(Debug, Clone)]
pub struct EnabledSource<'a> {
    pub id: SourceId,
    pub kind: SourceKind,
    pub config: &'a SourceConfig,
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "referee.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Detection, cost and execution parameters.
    pub arbitrage: ArbitrageConfig,

    /// Price sources keyed by name. The name doubles as the source id.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,

    /// WebSocket reconnection settings.
    #[serde(default)]
    pub reconnection: ReconnectionConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_database_path() -> String {
    "referee.db".to_string()
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., negative fees, fewer than two sources)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                config.database = path;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let arb = &self.arbitrage;
        let instrument = InstrumentId::from(arb.instrument.as_str());
        if instrument.assets().is_none() {
            return Err(invalid("instrument", "must look like BASE/QUOTE").into());
        }
        if arb.trade_notional <= Decimal::ZERO {
            return Err(invalid("trade_notional", "must be greater than 0").into());
        }
        if arb.network_fee < Decimal::ZERO {
            return Err(invalid("network_fee", "must be 0 or greater").into());
        }
        if arb.mode == ModeConfig::Polling && arb.check_interval_ms == 0 {
            return Err(invalid("check_interval_ms", "must be greater than 0 in polling mode").into());
        }
        if arb.channel_capacity == 0 {
            return Err(invalid("channel_capacity", "must be greater than 0").into());
        }
        if arb.persist_timeout_ms == 0 {
            return Err(invalid("persist_timeout_ms", "must be greater than 0").into());
        }

        for (name, source) in &self.sources {
            source.kind_for(name)?;
            if source.taker_fee_pct < Decimal::ZERO || source.taker_fee_pct >= Decimal::ONE_HUNDRED
            {
                return Err(invalid(
                    "taker_fee_pct",
                    format!("source '{name}' fee must be in [0, 100)"),
                )
                .into());
            }
            if let Some(url) = &source.url {
                url::Url::parse(url)
                    .map_err(|e| invalid("url", format!("source '{name}': {e}")))?;
            }
        }
        let enabled = self.sources.values().filter(|s| s.enabled).count();
        if enabled < 2 {
            return Err(invalid(
                "sources",
                format!("at least two enabled sources are required, found {enabled}"),
            )
            .into());
        }

        if self.reconnection.initial_delay_ms == 0 {
            return Err(invalid("initial_delay_ms", "must be greater than 0").into());
        }
        if self.reconnection.max_delay_ms < self.reconnection.initial_delay_ms {
            return Err(invalid("max_delay_ms", "must be >= initial_delay_ms").into());
        }
        if self.reconnection.backoff_multiplier < 1.0 {
            return Err(invalid("backoff_multiplier", "must be >= 1.0").into());
        }

        Ok(())
    }

    /// Enabled sources in name order.
    ///
    /// Kinds were checked by [`Config::validate`]; a source whose kind no
    /// longer resolves is skipped.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<EnabledSource<'_>> {
        self.sources
            .iter()
            .filter(|(_, source)| source.enabled)
            .filter_map(|(name, source)| {
                source.kind_for(name).ok().map(|kind| EnabledSource {
                    id: SourceId::from(name.as_str()),
                    kind,
                    config: source,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn instrument(&self) -> InstrumentId {
        InstrumentId::from(self.arbitrage.instrument.as_str())
    }

    /// Taker fees of the enabled sources.
    #[must_use]
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.enabled_sources()
            .into_iter()
            .map(|source| (source.id, source.config.taker_fee_pct))
            .collect()
    }

    #[must_use]
    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.arbitrage.trade_notional, self.arbitrage.network_fee)
    }

    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        let arb = &self.arbitrage;
        let mode = match arb.mode {
            ModeConfig::Event => DetectionMode::EventDriven,
            ModeConfig::Polling => DetectionMode::Polling {
                interval: Duration::from_millis(arb.check_interval_ms),
            },
        };
        let max_quote_age =
            (arb.max_quote_age_ms > 0).then(|| Duration::from_millis(arb.max_quote_age_ms));

        EngineSettings {
            mode,
            max_quote_age,
            shutdown_grace: Duration::from_millis(arb.shutdown_grace_ms),
        }
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.arbitrage.simulated_latency_ms)
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.arbitrage.persist_timeout_ms)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BASE: &str = r#"
        [arbitrage]
        trade_notional = 1000.0
        network_fee = 5.0

        [sources.kraken]
        taker_fee_pct = 0.26

        [sources.binance]
        taker_fee_pct = 0.1
    "#;

    #[test]
    fn defaults_are_applied() {
        let config: Config = toml::from_str(BASE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.arbitrage.instrument, "BTC/EUR");
        assert_eq!(config.arbitrage.mode, ModeConfig::Event);
        assert_eq!(config.arbitrage.channel_capacity, 100);
        assert_eq!(config.arbitrage.max_quote_age_ms, 30_000);
        assert_eq!(config.reconnection.initial_delay_ms, 1000);
        assert_eq!(config.reconnection.max_delay_ms, 16000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn fee_schedule_covers_enabled_sources() {
        let config: Config = toml::from_str(BASE).unwrap();
        let fees = config.fee_schedule();

        assert_eq!(fees.len(), 2);
        assert_eq!(fees.taker_fee(&SourceId::from("kraken")), Some(dec!(0.26)));
        assert_eq!(fees.taker_fee(&SourceId::from("binance")), Some(dec!(0.1)));
    }

    #[test]
    fn zero_max_age_disables_staleness() {
        let toml = BASE.replace("network_fee = 5.0", "network_fee = 5.0\nmax_quote_age_ms = 0");
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(config.engine_settings().max_quote_age.is_none());
    }

    #[test]
    fn polling_mode_maps_interval() {
        let toml = BASE.replace(
            "network_fee = 5.0",
            "network_fee = 5.0\nmode = \"polling\"\ncheck_interval_ms = 100",
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            config.engine_settings().mode,
            DetectionMode::Polling {
                interval: Duration::from_millis(100)
            }
        );
    }

    #[test]
    fn disabled_source_does_not_count() {
        let toml = format!("{BASE}\nenabled = false\n");
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(config.validate().is_err());
        assert_eq!(config.enabled_sources().len(), 1);
    }
}
