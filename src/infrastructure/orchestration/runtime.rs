//! Runtime lifecycle: wire feeds, engine and persistence together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::feed::run_feed;
use crate::adapter::outbound::exchange::create_stream;
use crate::adapter::outbound::sqlite::SqliteOpportunityRepository;
use crate::application::{Engine, ExecutionSimulator, OpportunityDetector};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::exchange::ReconnectingQuoteStream;
use crate::port::{OpportunityRepository, QuoteStream};

/// How long feed tasks get to notice shutdown before being aborted.
const FEED_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the engine described by `config` on top of `repository`.
#[must_use]
pub fn build_engine(
    config: &Config,
    repository: Arc<dyn OpportunityRepository>,
    shutdown: watch::Receiver<bool>,
) -> Engine {
    let detector = OpportunityDetector::new(
        config.instrument(),
        config.fee_schedule(),
        config.cost_model(),
    );
    let simulator = ExecutionSimulator::new(
        config.simulated_latency(),
        config.persist_timeout(),
        repository,
    );
    Engine::new(detector, simulator, config.engine_settings(), shutdown)
}

/// Run feeds into `engine` until shutdown.
///
/// Every stream gets its own task; all of them share one bounded channel
/// of `capacity` quotes.
pub async fn run_pipeline<S>(
    engine: Arc<Engine>,
    streams: Vec<S>,
    capacity: usize,
    shutdown: watch::Receiver<bool>,
) where
    S: QuoteStream + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let mut feeds = JoinSet::new();
    for stream in streams {
        feeds.spawn(run_feed(stream, tx.clone(), shutdown.clone()));
    }
    drop(tx);

    engine.run(rx).await;

    let stopped = tokio::time::timeout(FEED_STOP_TIMEOUT, async {
        while let Some(joined) = feeds.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Feed task failed");
            }
        }
    })
    .await;
    if stopped.is_err() {
        warn!(remaining = feeds.len(), "Aborting feeds that did not stop in time");
        feeds.abort_all();
    }
}

/// Runtime entrypoint: open storage, connect every enabled source and run
/// until `shutdown` fires.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a stream cannot be
/// created from its configuration.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let instrument = config.instrument();
    info!(instrument = %instrument, "Starting referee");

    let repository = SqliteOpportunityRepository::open(&config.database)?;
    info!(database = %config.database, "Database initialized");

    let mut streams = Vec::new();
    for source in config.enabled_sources() {
        let inner = create_stream(&source, &instrument)?;
        info!(source = %source.id, kind = source.kind.as_str(), "Source configured");
        streams.push(ReconnectingQuoteStream::new(
            inner,
            config.reconnection.clone(),
        ));
    }

    let engine = Arc::new(build_engine(
        &config,
        Arc::new(repository),
        shutdown.clone(),
    ));
    run_pipeline(
        engine,
        streams,
        config.arbitrage.channel_capacity,
        shutdown,
    )
    .await;

    info!("referee stopped");
    Ok(())
}
