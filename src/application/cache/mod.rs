//! Runtime caches used by application services.
//!
//! - [`quote::QuoteStore`]: Latest quote per source with point-in-time snapshots

pub mod quote;

pub use quote::{QuoteSnapshot, QuoteStore, StoredQuote};
