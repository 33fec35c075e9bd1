use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

pub const VALID: &str = r#"
database = "referee.db"

[arbitrage]
instrument = "BTC/EUR"
trade_notional = 1000.0
network_fee = 5.0
simulated_latency_ms = 20

[sources.kraken]
taker_fee_pct = 0.26

[sources.binance]
taker_fee_pct = 0.1
"#;

/// Write `contents` to `config.toml` inside a fresh temp dir.
///
/// Keep the returned dir alive for as long as the file is needed.
pub fn write_temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    (dir, path)
}
