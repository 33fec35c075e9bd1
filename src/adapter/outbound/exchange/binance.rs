//! Binance individual symbol ticker stream.
//!
//! The subscription is encoded in the URL (`/ws/<symbol>@ticker`); frames are
//! 24h ticker objects whose `b`/`a` fields carry the best bid and ask as
//! strings.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use super::{next_frame, open, Frame, WsStream};
use crate::domain::{
    id::{InstrumentId, SourceId},
    quote::Quote,
};
use crate::error::Result;
use crate::port::{QuoteEvent, QuoteStream};

pub const DEFAULT_BASE_URL: &str = "wss://stream.binance.com:9443/ws";

/// `BTC/EUR` -> `btceur`.
#[must_use]
pub fn symbol(instrument: &InstrumentId) -> String {
    instrument.as_str().replace('/', "").to_ascii_lowercase()
}

#[must_use]
pub fn default_url(instrument: &InstrumentId) -> String {
    format!("{DEFAULT_BASE_URL}/{}@ticker", symbol(instrument))
}

/// Fields of the 24h ticker payload this adapter reads.
#[derive(Debug, Deserialize)]
pub struct BinanceTicker {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "b")]
    pub bid: Decimal,
    #[serde(rename = "a")]
    pub ask: Decimal,
}

/// Parse one text frame. `Ok(None)` for frames that are not tickers.
///
/// # Errors
///
/// Returns a JSON error for malformed frames.
pub fn parse_message(
    text: &str,
    source: &SourceId,
    instrument: &InstrumentId,
) -> Result<Option<Quote>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.get("e").and_then(|e| e.as_str()) != Some("24hrTicker") {
        return Ok(None);
    }
    let ticker: BinanceTicker = serde_json::from_value(value)?;
    Ok(Some(
        Quote::new(source.clone(), instrument.clone(), ticker.bid, ticker.ask)
            .observed_at(Utc::now()),
    ))
}

/// Binance ticker stream for one instrument.
pub struct BinanceQuoteStream {
    source: SourceId,
    instrument: InstrumentId,
    url: String,
    ws: Option<WsStream>,
}

impl BinanceQuoteStream {
    #[must_use]
    pub fn new(source: SourceId, instrument: InstrumentId, url: Option<String>) -> Self {
        let url = url.unwrap_or_else(|| default_url(&instrument));
        Self {
            source,
            instrument,
            url,
            ws: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteStream for BinanceQuoteStream {
    async fn connect(&mut self) -> Result<()> {
        let ws = open(&self.url).await?;
        info!(source = %self.source, symbol = %symbol(&self.instrument), "Subscribed to ticker");
        self.ws = Some(ws);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<QuoteEvent> {
        let ws = self.ws.as_mut()?;

        loop {
            match next_frame(ws).await {
                Frame::Text(text) => match parse_message(&text, &self.source, &self.instrument) {
                    Ok(Some(quote)) => return Some(QuoteEvent::Quote(quote)),
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(source = %self.source, error = %e, bytes = text.len(), "Failed to parse message");
                        continue;
                    }
                },
                Frame::Closed(reason) => {
                    self.ws = None;
                    return Some(QuoteEvent::Disconnected { reason });
                }
            }
        }
    }

    fn source(&self) -> &SourceId {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids() -> (SourceId, InstrumentId) {
        (SourceId::from("binance"), InstrumentId::from("BTC/EUR"))
    }

    #[test]
    fn url_is_built_from_instrument() {
        assert_eq!(
            default_url(&InstrumentId::from("BTC/EUR")),
            "wss://stream.binance.com:9443/ws/btceur@ticker"
        );
    }

    #[test]
    fn ticker_frame_becomes_quote() {
        let (source, instrument) = ids();
        let text = r#"{"e":"24hrTicker","E":1700000000000,"s":"BTCEUR","p":"10.0","b":"61000.00","B":"0.3","a":"61050.00","A":"0.2","c":"61010.00"}"#;

        let quote = parse_message(text, &source, &instrument).unwrap().unwrap();

        assert_eq!(quote.source().as_str(), "binance");
        assert_eq!(quote.bid(), dec!(61000));
        assert_eq!(quote.ask(), dec!(61050));
        assert!(quote.timestamp().is_some());
    }

    #[test]
    fn non_ticker_frames_are_ignored() {
        let (source, instrument) = ids();
        assert!(parse_message(r#"{"result":null,"id":1}"#, &source, &instrument)
            .unwrap()
            .is_none());
    }

    #[test]
    fn bad_price_is_an_error() {
        let (source, instrument) = ids();
        let text = r#"{"e":"24hrTicker","s":"BTCEUR","b":"abc","a":"61050.00"}"#;
        assert!(parse_message(text, &source, &instrument).is_err());
    }

    #[test]
    fn url_override_is_kept() {
        let (source, instrument) = ids();
        let stream =
            BinanceQuoteStream::new(source, instrument, Some("wss://example.test/ws".into()));
        assert_eq!(stream.url(), "wss://example.test/ws");
    }
}
