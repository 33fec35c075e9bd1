//! Simulated execution: latency delay, then persistence.
//!
//! Each opportunity is handled in its own task. The delay models the round
//! trip to the venues; prices are not re-read afterwards, so what gets
//! persisted is the trade that was intended at detection time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::shutdown;
use crate::domain::opportunity::Opportunity;
use crate::port::OpportunityRepository;

/// How the handling of one opportunity ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Delay elapsed and the repository accepted the record.
    Persisted,
    /// Shutdown fired before the record was submitted.
    Abandoned,
    /// The repository returned an error.
    Failed(String),
    /// The repository did not answer within the persist timeout.
    TimedOut,
}

/// Applies the configured execution latency and hands opportunities to the
/// repository.
pub struct ExecutionSimulator {
    latency: Duration,
    persist_timeout: Duration,
    repository: Arc<dyn OpportunityRepository>,
}

impl ExecutionSimulator {
    #[must_use]
    pub fn new(
        latency: Duration,
        persist_timeout: Duration,
        repository: Arc<dyn OpportunityRepository>,
    ) -> Self {
        Self {
            latency,
            persist_timeout,
            repository,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Suspend for the execution latency and return the unchanged
    /// opportunity, or `None` if shutdown fired first.
    pub async fn simulate(
        &self,
        opportunity: Opportunity,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<Opportunity> {
        if shutdown::is_requested(shutdown) {
            return None;
        }

        tokio::select! {
            biased;
            () = shutdown::requested(shutdown) => return None,
            () = sleep(self.latency) => {}
        }

        if shutdown::is_requested(shutdown) {
            return None;
        }
        Some(opportunity)
    }

    /// Simulate, then persist under the bounded timeout. Never retries.
    pub async fn execute(
        &self,
        opportunity: Opportunity,
        mut shutdown: watch::Receiver<bool>,
    ) -> ExecutionOutcome {
        let Some(opportunity) = self.simulate(opportunity, &mut shutdown).await else {
            debug!("Shutdown during simulated latency, abandoning opportunity");
            return ExecutionOutcome::Abandoned;
        };

        match timeout(self.persist_timeout, self.repository.log_opportunity(&opportunity)).await {
            Ok(Ok(())) => {
                info!(
                    id = %opportunity.id(),
                    buy_source = %opportunity.buy_source(),
                    sell_source = %opportunity.sell_source(),
                    net_profit = %opportunity.net_profit(),
                    "Opportunity persisted"
                );
                ExecutionOutcome::Persisted
            }
            Ok(Err(e)) => {
                error!(
                    error = %e,
                    id = %opportunity.id(),
                    buy_source = %opportunity.buy_source(),
                    sell_source = %opportunity.sell_source(),
                    buy_price = %opportunity.buy_price(),
                    sell_price = %opportunity.sell_price(),
                    gross_profit = %opportunity.gross_profit(),
                    total_fees = %opportunity.total_fees(),
                    net_profit = %opportunity.net_profit(),
                    "Failed to persist opportunity"
                );
                ExecutionOutcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.persist_timeout.as_millis(),
                    id = %opportunity.id(),
                    buy_source = %opportunity.buy_source(),
                    sell_source = %opportunity.sell_source(),
                    buy_price = %opportunity.buy_price(),
                    sell_price = %opportunity.sell_price(),
                    net_profit = %opportunity.net_profit(),
                    "Persisting opportunity timed out"
                );
                ExecutionOutcome::TimedOut
            }
        }
    }
}
