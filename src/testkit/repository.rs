//! In-memory [`OpportunityRepository`] for tests.
//!
//! Clones share state, so a test can hand one clone to the simulator and
//! assert on another.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::opportunity::Opportunity;
use crate::error::{Error, Result};
use crate::port::OpportunityRepository;

#[derive(Default)]
struct Shared {
    recorded: Mutex<Vec<Opportunity>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

/// Records every persisted opportunity. Can be told to fail or stall.
#[derive(Clone, Default)]
pub struct RecordingRepository {
    shared: Arc<Shared>,
    delay: Option<Duration>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository whose every call returns a database error.
    pub fn failing() -> Self {
        let repo = Self::new();
        repo.set_failing(true);
        repo
    }

    /// Sleep for `delay` before recording (models a slow or hung store).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Toggle failure mode on all clones.
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successfully recorded opportunities.
    pub fn len(&self) -> usize {
        self.shared.recorded.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls to `log_opportunity`, successful or not.
    pub fn attempts(&self) -> usize {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    pub fn opportunities(&self) -> Vec<Opportunity> {
        self.shared.recorded.lock().unwrap().clone()
    }

    /// Poll until at least `count` opportunities are recorded or `within`
    /// elapses. Returns whether the count was reached.
    pub async fn wait_for(&self, count: usize, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if self.len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.len() >= count
    }
}

#[async_trait]
impl OpportunityRepository for RecordingRepository {
    async fn log_opportunity(&self, opportunity: &Opportunity) -> Result<()> {
        self.shared.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.shared.failing.load(Ordering::SeqCst) {
            return Err(Error::Database("simulated failure".into()));
        }

        self.shared
            .recorded
            .lock()
            .unwrap()
            .push(opportunity.clone());
        Ok(())
    }
}
