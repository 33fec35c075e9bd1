//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use crate::infrastructure::config::ReconnectionConfig;

/// Reconnection config with 1ms delays so retry loops still yield.
pub fn reconnection() -> ReconnectionConfig {
    ReconnectionConfig {
        initial_delay_ms: 1,
        max_delay_ms: 1,
        backoff_multiplier: 1.0,
    }
}

/// Minimal valid TOML with both production sources.
pub fn minimal_toml() -> &'static str {
    r#"
database = "referee.db"

[arbitrage]
instrument = "BTC/EUR"
trade_notional = 1000.0
network_fee = 5.0
simulated_latency_ms = 50

[sources.kraken]
taker_fee_pct = 0.26

[sources.binance]
taker_fee_pct = 0.1
"#
}
