use std::sync::Arc;
use std::time::Duration;

use referee::application::{
    DetectionMode, Engine, EngineSettings, ExecutionSimulator, OpportunityDetector,
};
use referee::port::OpportunityRepository;
use referee::testkit::domain::{cost_model, fees, INSTRUMENT};
use tokio::sync::watch;

/// Engine over the reference fee table with the given latency.
pub fn engine(
    repository: Arc<dyn OpportunityRepository>,
    latency: Duration,
    mode: DetectionMode,
    shutdown: watch::Receiver<bool>,
) -> Engine {
    let detector = OpportunityDetector::new(INSTRUMENT.into(), fees(), cost_model());
    let simulator = ExecutionSimulator::new(latency, Duration::from_secs(1), repository);
    let settings = EngineSettings {
        mode,
        max_quote_age: None,
        shutdown_grace: Duration::from_millis(200),
    };
    Engine::new(detector, simulator, settings, shutdown)
}

/// Poll `condition` every 5ms until it holds or `within` elapses.
pub async fn eventually(mut condition: impl FnMut() -> bool, within: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
