//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`stream`] - Mock [`QuoteStream`](crate::port::QuoteStream)
//!   implementations: `ScriptedQuoteStream`, `ChannelQuoteStream`.
//! - [`domain`] - Builders for domain primitives: quotes, opportunities.
//! - [`repository`] - In-memory [`OpportunityRepository`](crate::port::OpportunityRepository)
//!   that records, fails or stalls on demand.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod repository;
pub mod stream;
