//! Per-source feed task.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::application::shutdown;
use crate::domain::quote::Quote;
use crate::port::{QuoteEvent, QuoteStream};

/// Pump quotes from one stream into the engine channel until shutdown.
///
/// Sending blocks while the channel is full, so a slow engine slows the
/// feeds instead of growing a queue. A failed initial connect is not fatal:
/// the stream's own reconnection logic takes over on the first read.
pub async fn run_feed<S: QuoteStream>(
    mut stream: S,
    quotes: mpsc::Sender<Quote>,
    mut shutdown: watch::Receiver<bool>,
) {
    let source = stream.source().clone();

    tokio::select! {
        biased;
        () = shutdown::requested(&mut shutdown) => return,
        result = stream.connect() => {
            if let Err(e) = result {
                warn!(source = %source, error = %e, "Initial connection failed");
            }
        }
    }

    loop {
        let event = tokio::select! {
            biased;
            () = shutdown::requested(&mut shutdown) => break,
            event = stream.next_event() => event,
        };

        match event {
            Some(QuoteEvent::Quote(quote)) => {
                let sent = tokio::select! {
                    biased;
                    () = shutdown::requested(&mut shutdown) => break,
                    sent = quotes.send(quote) => sent,
                };
                if sent.is_err() {
                    debug!(source = %source, "Engine channel closed");
                    break;
                }
            }
            Some(QuoteEvent::Connected) => info!(source = %source, "Feed connected"),
            Some(QuoteEvent::Disconnected { reason }) => {
                warn!(source = %source, reason = %reason, "Feed disconnected");
            }
            None => {
                warn!(source = %source, "Feed ended");
                break;
            }
        }
    }

    info!(source = %source, "Feed stopped");
}
