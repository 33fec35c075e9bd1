//! Detection engine: ingestion, detection passes and execution dispatch.
//!
//! Quotes arrive from any number of feeds and only touch the [`QuoteStore`].
//! A single detection loop runs passes over a fresh snapshot, either on
//! every ingested quote (event-driven) or on a fixed interval (polling), and
//! spawns one execution task per profitable opportunity so that simulated
//! latency and persistence never block ingestion or later passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinSet;
use tokio::time::{interval, timeout, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::cache::{QuoteSnapshot, QuoteStore};
use super::detector::OpportunityDetector;
use super::shutdown;
use super::simulator::{ExecutionOutcome, ExecutionSimulator};
use crate::domain::{opportunity::Opportunity, quote::Quote};

/// What triggers a detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Every ingested quote wakes the detector. Bursts coalesce into one pass.
    EventDriven,
    /// A timer triggers a pass at a fixed interval.
    Polling { interval: Duration },
}

/// Engine tuning taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub mode: DetectionMode,
    /// Quotes older than this are left out of detection. `None` keeps all.
    pub max_quote_age: Option<Duration>,
    /// How long in-flight executions get to finish after shutdown.
    pub shutdown_grace: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: DetectionMode::EventDriven,
            max_quote_age: Some(Duration::from_secs(30)),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Counters for observability and tests.
#[derive(Debug, Default)]
pub struct EngineStats {
    quotes_ingested: AtomicU64,
    quotes_rejected: AtomicU64,
    passes: AtomicU64,
    opportunities: AtomicU64,
}

impl EngineStats {
    pub fn quotes_ingested(&self) -> u64 {
        self.quotes_ingested.load(Ordering::Relaxed)
    }

    pub fn quotes_rejected(&self) -> u64 {
        self.quotes_rejected.load(Ordering::Relaxed)
    }

    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    pub fn opportunities(&self) -> u64 {
        self.opportunities.load(Ordering::Relaxed)
    }
}

/// Owns the quote store and the concurrency discipline around it.
pub struct Engine {
    store: QuoteStore,
    detector: OpportunityDetector,
    simulator: Arc<ExecutionSimulator>,
    settings: EngineSettings,
    wake: Notify,
    stats: EngineStats,
    shutdown: watch::Receiver<bool>,
}

impl Engine {
    #[must_use]
    pub fn new(
        detector: OpportunityDetector,
        simulator: ExecutionSimulator,
        settings: EngineSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            store: QuoteStore::new(),
            detector,
            simulator: Arc::new(simulator),
            settings,
            wake: Notify::new(),
            stats: EngineStats::default(),
            shutdown,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Record a quote. Never waits on detection or persistence.
    ///
    /// Quotes for another instrument are dropped.
    pub fn ingest(&self, quote: Quote) {
        if quote.instrument() != self.detector.instrument() {
            debug!(
                source = %quote.source(),
                instrument = %quote.instrument(),
                expected = %self.detector.instrument(),
                "Dropping quote for foreign instrument"
            );
            self.stats.quotes_rejected.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.store.update(quote);
        self.stats.quotes_ingested.fetch_add(1, Ordering::Relaxed);

        if self.settings.mode == DetectionMode::EventDriven {
            self.wake.notify_one();
        }
    }

    /// Snapshot used for detection, with stale quotes removed.
    #[must_use]
    pub fn snapshot(&self) -> QuoteSnapshot {
        let snapshot = self.store.snapshot();
        match self.settings.max_quote_age {
            Some(max_age) => snapshot.fresh(Utc::now(), max_age),
            None => snapshot,
        }
    }

    /// Run one detection pass over the current snapshot.
    #[must_use]
    pub fn detect_now(&self) -> Vec<Opportunity> {
        self.stats.passes.fetch_add(1, Ordering::Relaxed);
        let snapshot = self.snapshot();
        let opportunities = self.detector.detect(&snapshot);
        self.stats
            .opportunities
            .fetch_add(opportunities.len() as u64, Ordering::Relaxed);
        opportunities
    }

    /// Drive ingestion and detection until shutdown.
    ///
    /// Ingestion runs on its own task so a detection pass never holds up the
    /// feed channel.
    pub async fn run(self: Arc<Self>, quotes: mpsc::Receiver<Quote>) {
        info!(mode = ?self.settings.mode, "Engine started");

        let ingest = {
            let engine = Arc::clone(&self);
            tokio::spawn(async move { engine.ingest_loop(quotes).await })
        };
        self.detection_loop().await;
        if let Err(e) = ingest.await {
            warn!(error = %e, "Ingestion task failed");
        }

        info!(
            quotes = self.stats.quotes_ingested(),
            passes = self.stats.passes(),
            opportunities = self.stats.opportunities(),
            "Engine stopped"
        );
    }

    /// Pull quotes from the shared feed channel into the store.
    pub async fn ingest_loop(&self, mut quotes: mpsc::Receiver<Quote>) {
        let mut shutdown = self.shutdown.clone();
        loop {
            tokio::select! {
                biased;
                () = shutdown::requested(&mut shutdown) => break,
                quote = quotes.recv() => match quote {
                    Some(quote) => self.ingest(quote),
                    None => {
                        warn!("Quote channel closed, ingestion stopped");
                        break;
                    }
                },
            }
        }
    }

    /// Background detection trigger plus execution bookkeeping.
    pub async fn detection_loop(&self) {
        let mut shutdown = self.shutdown.clone();
        let mut executions: JoinSet<ExecutionOutcome> = JoinSet::new();
        let mut ticker = match self.settings.mode {
            DetectionMode::Polling { interval: period } => {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                Some(ticker)
            }
            DetectionMode::EventDriven => None,
        };

        loop {
            tokio::select! {
                biased;
                () = shutdown::requested(&mut shutdown) => break,
                Some(joined) = executions.join_next(), if !executions.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Execution task failed");
                    }
                }
                () = self.next_trigger(&mut ticker) => self.dispatch(&mut executions),
            }
        }

        self.drain(executions).await;
    }

    async fn next_trigger(&self, ticker: &mut Option<Interval>) {
        match ticker {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => self.wake.notified().await,
        }
    }

    fn dispatch(&self, executions: &mut JoinSet<ExecutionOutcome>) {
        for opportunity in self.detect_now() {
            if shutdown::is_requested(&self.shutdown) {
                debug!("Shutdown requested, not dispatching further opportunities");
                break;
            }

            info!(
                id = %opportunity.id(),
                buy_source = %opportunity.buy_source(),
                sell_source = %opportunity.sell_source(),
                buy_price = %opportunity.buy_price(),
                sell_price = %opportunity.sell_price(),
                net_profit = %opportunity.net_profit(),
                "Profitable arbitrage opportunity found"
            );

            let simulator = Arc::clone(&self.simulator);
            let shutdown = self.shutdown.clone();
            executions.spawn(async move { simulator.execute(opportunity, shutdown).await });
        }
    }

    async fn drain(&self, mut executions: JoinSet<ExecutionOutcome>) {
        if executions.is_empty() {
            return;
        }

        let pending = executions.len();
        debug!(pending, "Waiting for in-flight executions");
        let drained = timeout(self.settings.shutdown_grace, async {
            while executions.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = executions.len(),
                grace_ms = self.settings.shutdown_grace.as_millis(),
                "Grace period elapsed, aborting in-flight executions"
            );
            executions.abort_all();
        }
    }
}
