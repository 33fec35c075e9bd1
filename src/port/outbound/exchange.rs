//! Exchange port for streaming normalized quotes.
//!
//! Each price source is wrapped by an adapter that owns the transport and the
//! wire format and yields [`QuoteEvent`]s. Reconnection is layered on top by
//! a wrapper, so adapters only report disconnects.

use async_trait::async_trait;

use crate::domain::{id::SourceId, quote::Quote};
use crate::error::Error;

/// Events produced by a quote stream.
#[derive(Debug, Clone)]
pub enum QuoteEvent {
    /// A new top-of-book quote.
    Quote(Quote),
    /// Connection established and subscribed.
    Connected,
    /// Connection lost.
    Disconnected {
        /// Human-readable reason for the disconnect.
        reason: String,
    },
}

impl QuoteEvent {
    /// The quote carried by this event, if any.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Quote(quote) => Some(quote),
            _ => None,
        }
    }
}

/// Real-time quote stream from one price source.
///
/// Implementations handle connection management, subscription and message
/// parsing for their specific exchange protocols.
#[async_trait]
pub trait QuoteStream: Send {
    /// Connect and subscribe to the configured instrument.
    async fn connect(&mut self) -> Result<(), Error>;

    /// Get the next event. `None` means the stream has ended.
    async fn next_event(&mut self) -> Option<QuoteEvent>;

    /// Identifier of the source this stream reads from.
    fn source(&self) -> &SourceId;
}

/// Implement QuoteStream for boxed trait objects to allow use with generic wrappers.
#[async_trait]
impl QuoteStream for Box<dyn QuoteStream> {
    async fn connect(&mut self) -> Result<(), Error> {
        (**self).connect().await
    }

    async fn next_event(&mut self) -> Option<QuoteEvent> {
        (**self).next_event().await
    }

    fn source(&self) -> &SourceId {
        (**self).source()
    }
}
