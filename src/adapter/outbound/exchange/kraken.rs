//! Kraken public ticker feed.
//!
//! Kraken's v1 WebSocket API sends control messages as JSON objects and
//! channel data as arrays:
//! ```json
//! {"event":"heartbeat"}
//! [340,{"a":["60050.1",1,"1.0"],"b":["60000.0",0,"0.5"],"c":["60010.0","0.1"]},"ticker","XBT/EUR"]
//! ```

use async_trait::async_trait;
use chrono::Utc;
use futures_util::SinkExt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::{next_frame, open, Frame, WsStream};
use crate::domain::{
    id::{InstrumentId, SourceId},
    quote::Quote,
};
use crate::error::{Error, Result};
use crate::port::{QuoteEvent, QuoteStream};

pub const DEFAULT_URL: &str = "wss://ws.kraken.com";

/// Kraken names bitcoin `XBT`.
#[must_use]
pub fn pair_name(instrument: &InstrumentId) -> String {
    match instrument.assets() {
        Some((base, quote)) => {
            let base = if base.eq_ignore_ascii_case("BTC") {
                "XBT".to_string()
            } else {
                base.to_ascii_uppercase()
            };
            format!("{base}/{}", quote.to_ascii_uppercase())
        }
        None => instrument.as_str().to_ascii_uppercase(),
    }
}

#[derive(Debug, Serialize)]
pub struct KrakenSubscribeMessage {
    pub event: &'static str,
    pub pair: Vec<String>,
    pub subscription: KrakenSubscription,
}

#[derive(Debug, Serialize)]
pub struct KrakenSubscription {
    pub name: &'static str,
}

impl KrakenSubscribeMessage {
    pub fn ticker(pair: String) -> Self {
        Self {
            event: "subscribe",
            pair: vec![pair],
            subscription: KrakenSubscription { name: "ticker" },
        }
    }
}

/// Messages received from Kraken.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum KrakenMessage {
    /// `[channelId, ticker, "ticker", pair]`
    Ticker(serde_json::Value, KrakenTicker, String, String),
    /// `heartbeat`, `systemStatus`, `subscriptionStatus`.
    Event(KrakenEvent),
    Unknown(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub struct KrakenTicker {
    /// Best ask: `[price, wholeLotVolume, lotVolume]`.
    pub a: Vec<serde_json::Value>,
    /// Best bid: `[price, wholeLotVolume, lotVolume]`.
    pub b: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct KrakenEvent {
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

fn level_price(level: &[serde_json::Value]) -> Option<Decimal> {
    level.first()?.as_str()?.parse().ok()
}

/// Parse one text frame. `Ok(None)` for control traffic.
///
/// # Errors
///
/// Returns [`Error::Parse`] for ticker frames with unreadable prices and
/// [`Error::Connection`] for rejected subscriptions.
pub fn parse_message(
    text: &str,
    source: &SourceId,
    instrument: &InstrumentId,
) -> Result<Option<Quote>> {
    match serde_json::from_str::<KrakenMessage>(text)? {
        KrakenMessage::Ticker(_, ticker, channel, pair) => {
            if channel != "ticker" {
                return Ok(None);
            }
            let (Some(ask), Some(bid)) = (level_price(&ticker.a), level_price(&ticker.b)) else {
                return Err(Error::Parse(format!("kraken ticker for {pair} has no price")));
            };
            Ok(Some(
                Quote::new(source.clone(), instrument.clone(), bid, ask).observed_at(Utc::now()),
            ))
        }
        KrakenMessage::Event(event) => {
            if event.status.as_deref() == Some("error") {
                return Err(Error::Connection(format!(
                    "kraken {} rejected: {}",
                    event.event,
                    event.error_message.unwrap_or_default()
                )));
            }
            debug!(event = %event.event, status = ?event.status, "Kraken control message");
            Ok(None)
        }
        KrakenMessage::Unknown(_) => Ok(None),
    }
}

/// Kraken ticker stream for one instrument.
pub struct KrakenQuoteStream {
    source: SourceId,
    instrument: InstrumentId,
    url: String,
    ws: Option<WsStream>,
}

impl KrakenQuoteStream {
    #[must_use]
    pub fn new(source: SourceId, instrument: InstrumentId, url: Option<String>) -> Self {
        Self {
            source,
            instrument,
            url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            ws: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteStream for KrakenQuoteStream {
    async fn connect(&mut self) -> Result<()> {
        let mut ws = open(&self.url).await?;

        let pair = pair_name(&self.instrument);
        let json = serde_json::to_string(&KrakenSubscribeMessage::ticker(pair.clone()))?;
        info!(source = %self.source, pair = %pair, "Subscribing to ticker");
        ws.send(Message::Text(json)).await?;

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
                    Err(Error::Connection(reason)) => {
                        self.ws = None;
                        return Some(QuoteEvent::Disconnected { reason });
                    }
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
        (SourceId::from("kraken"), InstrumentId::from("BTC/EUR"))
    }

    #[test]
    fn btc_maps_to_xbt() {
        assert_eq!(pair_name(&InstrumentId::from("BTC/EUR")), "XBT/EUR");
        assert_eq!(pair_name(&InstrumentId::from("eth/usd")), "ETH/USD");
    }

    #[test]
    fn subscribe_message_serializes_correctly() {
        let json = serde_json::to_string(&KrakenSubscribeMessage::ticker("XBT/EUR".into())).unwrap();
        assert_eq!(
            json,
            r#"{"event":"subscribe","pair":["XBT/EUR"],"subscription":{"name":"ticker"}}"#
        );
    }

    #[test]
    fn ticker_frame_becomes_quote() {
        let (source, instrument) = ids();
        let text = r#"[340,{"a":["60050.10000",1,"1.000"],"b":["60000.00000",0,"0.500"],"c":["60010.0","0.1"],"v":["1","2"]},"ticker","XBT/EUR"]"#;

        let quote = parse_message(text, &source, &instrument).unwrap().unwrap();

        assert_eq!(quote.source().as_str(), "kraken");
        assert_eq!(quote.instrument().as_str(), "BTC/EUR");
        assert_eq!(quote.ask(), dec!(60050.1));
        assert_eq!(quote.bid(), dec!(60000));
        assert!(quote.timestamp().is_some());
    }

    #[test]
    fn control_messages_are_ignored() {
        let (source, instrument) = ids();
        for text in [
            r#"{"event":"heartbeat"}"#,
            r#"{"connectionID":1,"event":"systemStatus","status":"online","version":"1.9.0"}"#,
            r#"{"channelID":340,"channelName":"ticker","event":"subscriptionStatus","pair":"XBT/EUR","status":"subscribed","subscription":{"name":"ticker"}}"#,
        ] {
            assert!(parse_message(text, &source, &instrument).unwrap().is_none(), "{text}");
        }
    }

    #[test]
    fn rejected_subscription_is_an_error() {
        let (source, instrument) = ids();
        let text = r#"{"errorMessage":"Currency pair not supported","event":"subscriptionStatus","status":"error"}"#;
        assert!(matches!(
            parse_message(text, &source, &instrument),
            Err(Error::Connection(_))
        ));
    }

    #[test]
    fn ticker_without_prices_is_a_parse_error() {
        let (source, instrument) = ids();
        let text = r#"[340,{"a":[],"b":[]},"ticker","XBT/EUR"]"#;
        assert!(matches!(
            parse_message(text, &source, &instrument),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let (source, instrument) = ids();
        assert!(parse_message("not json", &source, &instrument).is_err());
    }

    #[test]
    fn default_url_is_used() {
        let (source, instrument) = ids();
        let stream = KrakenQuoteStream::new(source, instrument, None);
        assert_eq!(stream.url(), DEFAULT_URL);
        assert_eq!(stream.source().as_str(), "kraken");
    }
}
