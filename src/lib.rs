//! Referee - cross-exchange arbitrage detection with simulated execution.
//!
//! Quotes for one instrument stream in from several exchanges. Whenever the
//! best ask on one venue and the best bid on another leave a profit after
//! taker fees and a flat network fee, the opportunity is "executed" after a
//! simulated latency and recorded in SQLite.
//!
//! # Architecture
//!
//! - [`domain`] - Quotes, fees, the cost model and opportunities
//! - [`port`] - Traits for quote streams and opportunity storage
//! - [`application`] - Quote store, detector, execution simulator, engine
//! - [`adapter`] - Kraken and Binance websockets, SQLite, the CLI
//! - [`infrastructure`] - Configuration, reconnection, runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use referee::infrastructure::config::Config;
//!
//! let config = Config::load("config.toml").unwrap();
//! let detector = referee::application::OpportunityDetector::new(
//!     config.instrument(),
//!     config.fee_schedule(),
//!     config.cost_model(),
//! );
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
