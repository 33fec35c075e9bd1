//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`exchange`] - Reconnection on top of quote streams
//! - [`orchestration`] - Runtime wiring and lifecycle

pub mod config;
pub mod exchange;
pub mod orchestration;
