//! `referee check config`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::{Config, ModeConfig};

/// Validate configuration file without starting the detector.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let sources = config.enabled_sources();

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "valid": true,
            "config": path.display().to_string(),
            "instrument": config.arbitrage.instrument,
            "mode": mode_label(&config),
            "database": config.database,
            "sources": sources
                .iter()
                .map(|s| json!({
                    "id": s.id.as_str(),
                    "kind": s.kind.as_str(),
                    "taker_fee_pct": s.config.taker_fee_pct.to_string(),
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Instrument", &config.arbitrage.instrument);
    output::field("Mode", mode_label(&config));
    output::field("Notional", config.arbitrage.trade_notional);
    output::field("Network fee", config.arbitrage.network_fee);
    output::field("Latency", format!("{}ms", config.arbitrage.simulated_latency_ms));
    output::field("Database", &config.database);
    for source in &sources {
        output::field(
            "Source",
            format!(
                "{} ({}, taker {}%)",
                source.id,
                source.kind.as_str(),
                source.config.taker_fee_pct
            ),
        );
    }

    let disabled = config.sources.len() - sources.len();
    if disabled > 0 {
        output::warning(&format!("{disabled} source(s) disabled"));
    }
    if config.arbitrage.max_quote_age_ms == 0 {
        output::warning("Staleness check disabled (max_quote_age_ms = 0)");
    }

    output::success("Configuration check complete");
    Ok(())
}

fn mode_label(config: &Config) -> String {
    match config.arbitrage.mode {
        ModeConfig::Event => "event".to_string(),
        ModeConfig::Polling => format!("polling every {}ms", config.arbitrage.check_interval_ms),
    }
}
