//! Reconnecting wrapper for QuoteStream.
//!
//! Provides automatic reconnection with exponential backoff for any
//! [`QuoteStream`] implementation. The wrapper transparently handles
//! disconnections; the adapter's own `connect` re-subscribes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::domain::id::SourceId;
use crate::error::Error;
use crate::infrastructure::config::ReconnectionConfig;
use crate::port::{QuoteEvent, QuoteStream};

/// Wrapper that adds automatic reconnection to any [`QuoteStream`].
///
/// Transparently handles disconnections by:
/// 1. Waiting with exponential backoff
/// 2. Reconnecting (which re-subscribes to the instrument)
///
/// Retries forever; the caller stops it by dropping the future on shutdown.
pub struct ReconnectingQuoteStream<S: QuoteStream> {
    /// The underlying quote stream being wrapped.
    inner: S,
    /// Reconnection and backoff configuration.
    config: ReconnectionConfig,
    /// Current consecutive failure count.
    consecutive_failures: u32,
    /// Current backoff delay in milliseconds.
    current_delay_ms: u64,
    /// Whether the stream is currently connected.
    connected: bool,
}

impl<S: QuoteStream> ReconnectingQuoteStream<S> {
    /// Create a new reconnecting wrapper around a quote stream.
    ///
    /// The wrapper starts in a disconnected state; call [`connect`](Self::connect)
    /// before reading events, or let `next_event` connect lazily.
    pub fn new(inner: S, config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            inner,
            config,
            consecutive_failures: 0,
            current_delay_ms: initial_delay,
            connected: false,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Reset backoff state after a successful connection.
    fn reset_backoff(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
    }

    /// Returns the current delay plus jitter and advances the delay for the
    /// next call, capped at `max_delay_ms`.
    fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let jitter_ms = self.jitter_ms(base_delay);
        let delay = base_delay + Duration::from_millis(jitter_ms);

        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);

        delay
    }

    /// Up to 20% jitter so feeds dropped together do not reconnect in lockstep.
    fn jitter_ms(&self, base_delay: Duration) -> u64 {
        let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
        if jitter_range_ms == 0 {
            return 0;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        (nanos as u64) % (jitter_range_ms + 1)
    }

    fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.connected = false;
    }

    /// Wait for the backoff delay, then attempt to reconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner connect fails.
    async fn reconnect(&mut self) -> Result<(), Error> {
        let delay = self.next_delay();
        info!(
            source = %self.inner.source(),
            delay_ms = delay.as_millis(),
            attempt = self.consecutive_failures + 1,
            "Reconnecting after delay"
        );
        sleep(delay).await;

        match self.inner.connect().await {
            Ok(()) => {
                info!(source = %self.inner.source(), "Reconnected successfully");
                self.connected = true;
                self.reset_backoff();
                Ok(())
            }
            Err(e) => {
                error!(source = %self.inner.source(), error = %e, "Reconnection failed");
                self.record_failure();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<S: QuoteStream> QuoteStream for ReconnectingQuoteStream<S> {
    async fn connect(&mut self) -> Result<(), Error> {
        let result = self.inner.connect().await;
        match &result {
            Ok(()) => {
                self.connected = true;
                self.reset_backoff();
            }
            Err(_) => self.record_failure(),
        }
        result
    }

    async fn next_event(&mut self) -> Option<QuoteEvent> {
        loop {
            if !self.connected {
                if let Err(e) = self.reconnect().await {
                    warn!(source = %self.inner.source(), error = %e, "Reconnection attempt failed, will retry");
                    continue;
                }
            }

            match self.inner.next_event().await {
                Some(QuoteEvent::Disconnected { reason }) => {
                    warn!(source = %self.inner.source(), reason = %reason, "Connection lost, will reconnect");
                    self.record_failure();
                    continue;
                }
                Some(event) => {
                    if self.consecutive_failures > 0 {
                        debug!("Received event after reconnection, resetting failure count");
                        self.reset_backoff();
                    }
                    return Some(event);
                }
                None => {
                    warn!(source = %self.inner.source(), "Quote stream ended unexpectedly, will reconnect");
                    self.record_failure();
                    continue;
                }
            }
        }
    }

    fn source(&self) -> &SourceId {
        self.inner.source()
    }
}
