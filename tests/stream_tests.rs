use std::sync::atomic::Ordering;
use std::time::Duration;

use referee::error::Error;
use referee::infrastructure::exchange::ReconnectingQuoteStream;
use referee::infrastructure::orchestration::run_feed;
use referee::port::QuoteEvent;
use referee::testkit::config::reconnection;
use referee::testkit::domain::quote;
use referee::testkit::stream::ScriptedQuoteStream;
use rust_decimal_macros::dec;
use tokio::sync::{mpsc, watch};

#[tokio::test]
async fn feed_survives_disconnects_and_stops_on_shutdown() {
    let scripted = ScriptedQuoteStream::new("kraken")
        .with_connect_results(vec![Ok(()), Err(Error::Connection("refused".into()))])
        .with_events(vec![
            Some(QuoteEvent::Quote(quote("kraken", dec!(100), dec!(101)))),
            Some(QuoteEvent::Disconnected {
                reason: "reset by peer".into(),
            }),
            Some(QuoteEvent::Quote(quote("kraken", dec!(102), dec!(103)))),
        ]);
    let connects = scripted.connect_counter();
    let stream = ReconnectingQuoteStream::new(scripted, reconnection());

    let (tx, mut rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed = tokio::spawn(run_feed(stream, tx, shutdown_rx));

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.bid(), dec!(100));
    assert_eq!(second.bid(), dec!(102));
    // initial connect, one failed reconnect, one successful reconnect
    assert!(connects.load(Ordering::SeqCst) >= 3);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), feed)
        .await
        .unwrap()
        .unwrap();
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn dropped_shutdown_sender_stops_feed() {
    let scripted = ScriptedQuoteStream::new("binance");
    let stream = ReconnectingQuoteStream::new(scripted, reconnection());

    let (tx, _rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed = tokio::spawn(run_feed(stream, tx, shutdown_rx));

    drop(shutdown_tx);
    tokio::time::timeout(Duration::from_secs(1), feed)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn closed_engine_channel_stops_feed() {
    let scripted = ScriptedQuoteStream::new("kraken")
        .with_quotes(vec![quote("kraken", dec!(100), dec!(101))]);

    let (tx, rx) = mpsc::channel(8);
    drop(rx);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::time::timeout(Duration::from_secs(1), run_feed(scripted, tx, shutdown_rx))
        .await
        .unwrap();
}
