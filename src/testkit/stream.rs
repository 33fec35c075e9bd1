//! Mock [`QuoteStream`] implementations for testing.
//!
//! - [`ScriptedQuoteStream`] - Pre-loaded connect results and events.
//!   Best for: error handling, reconnection logic, retry behavior.
//!
//! - [`ChannelQuoteStream`] - Channel-backed stream with external control handle.
//!   Best for: integration tests needing precise, on-demand event delivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{id::SourceId, quote::Quote};
use crate::error::Result;
use crate::port::{QuoteEvent, QuoteStream};

// ---------------------------------------------------------------------------
// ScriptedQuoteStream
// ---------------------------------------------------------------------------

/// A mock stream with scripted connect results and a fixed event queue.
///
/// Each call to `connect()` pops the next result from the queue (defaults to
/// `Ok(())` when exhausted). A `None` entry in the event queue ends the
/// stream at that point; an exhausted queue also ends it.
pub struct ScriptedQuoteStream {
    source: SourceId,
    connect_results: VecDeque<Result<()>>,
    events: VecDeque<Option<QuoteEvent>>,
    connect_count: Arc<AtomicU32>,
}

impl ScriptedQuoteStream {
    pub fn new(source: &str) -> Self {
        Self {
            source: SourceId::from(source),
            connect_results: VecDeque::new(),
            events: VecDeque::new(),
            connect_count: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    pub fn with_events(mut self, events: Vec<Option<QuoteEvent>>) -> Self {
        self.events = events.into();
        self
    }

    /// Convenience: queue one `Quote` event per quote.
    pub fn with_quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.events = quotes
            .into_iter()
            .map(|q| Some(QuoteEvent::Quote(q)))
            .collect();
        self
    }

    /// Shared counter for asserting connect call counts.
    pub fn connect_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_count)
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteStream for ScriptedQuoteStream {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<QuoteEvent> {
        self.events.pop_front().flatten()
    }

    fn source(&self) -> &SourceId {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// ChannelQuoteStream
// ---------------------------------------------------------------------------

/// A mock stream controlled externally via a [`ChannelQuoteHandle`].
pub struct ChannelQuoteStream {
    source: SourceId,
    event_rx: mpsc::Receiver<Option<QuoteEvent>>,
    connect_count: Arc<AtomicU32>,
}

/// Control handle for a [`ChannelQuoteStream`].
pub struct ChannelQuoteHandle {
    event_tx: mpsc::Sender<Option<QuoteEvent>>,
    connect_count: Arc<AtomicU32>,
}

impl ChannelQuoteHandle {
    /// Deliver a quote to the stream.
    pub async fn send(&self, quote: Quote) {
        let _ = self.event_tx.send(Some(QuoteEvent::Quote(quote))).await;
    }

    /// Deliver an arbitrary event.
    pub async fn send_event(&self, event: QuoteEvent) {
        let _ = self.event_tx.send(Some(event)).await;
    }

    /// Signal end-of-stream (causes `next_event` to return `None`).
    pub async fn close(&self) {
        let _ = self.event_tx.send(None).await;
    }

    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

/// Create a [`ChannelQuoteStream`] and its control [`ChannelQuoteHandle`].
pub fn channel_stream(source: &str, buffer: usize) -> (ChannelQuoteStream, ChannelQuoteHandle) {
    let (tx, rx) = mpsc::channel(buffer);
    let count = Arc::new(AtomicU32::new(0));
    (
        ChannelQuoteStream {
            source: SourceId::from(source),
            event_rx: rx,
            connect_count: Arc::clone(&count),
        },
        ChannelQuoteHandle {
            event_tx: tx,
            connect_count: count,
        },
    )
}

#[async_trait]
impl QuoteStream for ChannelQuoteStream {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<QuoteEvent> {
        match self.event_rx.recv().await {
            Some(Some(event)) => Some(event),
            Some(None) | None => None,
        }
    }

    fn source(&self) -> &SourceId {
        &self.source
    }
}
