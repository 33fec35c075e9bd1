//! Feed connection management.
//!
//! Transport adapters live under `adapter::outbound::exchange`; this module
//! layers reconnection on top of any [`QuoteStream`](crate::port::QuoteStream).

mod reconnecting;

pub use reconnecting::ReconnectingQuoteStream;
