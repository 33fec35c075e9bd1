//! WebSocket quote adapters for the supported exchanges.
//!
//! Each adapter owns one connection, sends its exchange's subscribe
//! message on `connect`, and turns ticker frames into [`Quote`]s. Both stamp
//! quotes with the local receive time.
//!
//! [`Quote`]: crate::domain::quote::Quote

pub mod binance;
pub mod factory;
pub mod kraken;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, trace};

use crate::error::Result;

pub use binance::BinanceQuoteStream;
pub use factory::create_stream;
pub use kraken::KrakenQuoteStream;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the socket produced after control frames were handled.
#[derive(Debug)]
pub(crate) enum Frame {
    Text(String),
    Closed(String),
}

pub(crate) async fn open(url: &str) -> Result<WsStream> {
    info!(url = %url, "Connecting to WebSocket");
    let (ws_stream, response) = connect_async(url).await?;
    info!(status = %response.status(), "WebSocket connected");
    Ok(ws_stream)
}

/// Read until a text frame arrives or the connection goes away.
///
/// Pings are answered; binary and pong frames are skipped.
pub(crate) async fn next_frame(ws: &mut WsStream) -> Frame {
    loop {
        let Some(msg) = ws.next().await else {
            return Frame::Closed("stream ended".into());
        };
        match msg {
            Ok(Message::Text(text)) => {
                trace!(bytes = text.len(), "Received WebSocket text frame");
                return Frame::Text(text);
            }
            Ok(Message::Ping(data)) => {
                trace!("Received WebSocket ping");
                if ws.send(Message::Pong(data)).await.is_err() {
                    return Frame::Closed("failed to send pong".into());
                }
            }
            Ok(Message::Close(frame)) => {
                info!(frame = ?frame, "WebSocket closed by server");
                return Frame::Closed(frame.map(|f| f.reason.to_string()).unwrap_or_default());
            }
            Ok(_) => continue,
            Err(e) => {
                error!(error = %e, "WebSocket error");
                return Frame::Closed(e.to_string());
            }
        }
    }
}
