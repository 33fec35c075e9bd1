//! Outbound adapters (driven side).

pub mod exchange;
pub mod sqlite;
