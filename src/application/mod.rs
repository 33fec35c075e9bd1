//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! through the ports to implement the detection pipeline.

pub mod cache;
pub mod detector;
pub mod engine;
pub mod shutdown;
pub mod simulator;

pub use detector::{Candidate, OpportunityDetector};
pub use engine::{DetectionMode, Engine, EngineSettings, EngineStats};
pub use simulator::{ExecutionOutcome, ExecutionSimulator};
