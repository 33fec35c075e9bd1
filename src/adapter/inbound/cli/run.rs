//! Handler for the `run` command.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::{Config, ModeConfig};
use crate::infrastructure::orchestration::run_with_shutdown;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    config.init_logging();
    if !output::is_quiet() && !config.logging.is_json() {
        print_startup_config(&config);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runtime = run_with_shutdown(config, shutdown_rx);
    tokio::pin!(runtime);

    tokio::select! {
        result = &mut runtime => return result,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Cannot listen for Ctrl-C, running until the process is stopped");
                return runtime.await;
            }
            info!("Shutdown signal received");
        }
    }

    let _ = shutdown_tx.send(true);
    runtime.await
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(mode) = args.mode {
        config.arbitrage.mode = mode;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".into();
    }
    if let Some(path) = &args.database {
        config.database = path.to_string_lossy().to_string();
    }
}

fn print_startup_config(config: &Config) {
    let mode = match config.arbitrage.mode {
        ModeConfig::Event => "event".to_string(),
        ModeConfig::Polling => format!("polling ({}ms)", config.arbitrage.check_interval_ms),
    };
    let sources: Vec<String> = config
        .enabled_sources()
        .iter()
        .map(|s| s.id.to_string())
        .collect();

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Instrument", &config.arbitrage.instrument);
    output::field("Sources", sources.join(", "));
    output::field("Mode", mode);
    output::field("Database", &config.database);
    if output::verbosity() > 0 {
        output::field("Notional", config.arbitrage.trade_notional);
        output::field("Network fee", config.arbitrage.network_fee);
        output::field("Latency", format!("{}ms", config.arbitrage.simulated_latency_ms));
    }
}
