//! Application orchestration.
//!
//! Runtime wiring and lifecycle management: one feed task per source, a
//! bounded channel into the engine, and a shared shutdown signal.

mod feed;
mod runtime;

pub use feed::run_feed;
pub use runtime::{build_engine, run_pipeline, run_with_shutdown};
