//! Detection and execution parameters.

use rust_decimal::Decimal;
use serde::Deserialize;

/// How detection passes are triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeConfig {
    /// Run a pass on every ingested quote.
    #[default]
    Event,
    /// Run a pass every `check_interval_ms`.
    Polling,
}

impl std::str::FromStr for ModeConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "event" => Ok(Self::Event),
            "polling" => Ok(Self::Polling),
            other => Err(format!("unknown mode '{other}' (expected event or polling)")),
        }
    }
}

/// `[arbitrage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ArbitrageConfig {
    /// Traded instrument in `BASE/QUOTE` form.
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Quote-currency amount committed per simulated trade.
    pub trade_notional: Decimal,
    /// Fixed cost per trade for moving the asset between venues.
    #[serde(default)]
    pub network_fee: Decimal,
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
    #[serde(default)]
    pub mode: ModeConfig,
    /// Only used in polling mode.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// `0` disables the staleness check.
    #[serde(default = "default_max_quote_age_ms")]
    pub max_quote_age_ms: u64,
    #[serde(default = "default_persist_timeout_ms")]
    pub persist_timeout_ms: u64,
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
    /// Capacity of the shared quote channel between feeds and the engine.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_instrument() -> String {
    "BTC/EUR".into()
}

const fn default_simulated_latency_ms() -> u64 {
    500
}

const fn default_check_interval_ms() -> u64 {
    250
}

const fn default_max_quote_age_ms() -> u64 {
    30_000
}

const fn default_persist_timeout_ms() -> u64 {
    5_000
}

const fn default_shutdown_grace_ms() -> u64 {
    5_000
}

const fn default_channel_capacity() -> usize {
    100
}
