//! Build quote streams from configuration.

use crate::domain::id::InstrumentId;
use crate::error::Result;
use crate::infrastructure::config::{EnabledSource, SourceKind};
use crate::port::QuoteStream;

/// Create the transport adapter for one configured source.
///
/// # Errors
///
/// Returns an error if the source's URL override does not parse.
pub fn create_stream(
    source: &EnabledSource<'_>,
    instrument: &InstrumentId,
) -> Result<Box<dyn QuoteStream>> {
    if let Some(url) = &source.config.url {
        url::Url::parse(url)?;
    }
    let url = source.config.url.clone();

    let stream: Box<dyn QuoteStream> = match source.kind {
        SourceKind::Kraken => Box::new(super::KrakenQuoteStream::new(
            source.id.clone(),
            instrument.clone(),
            url,
        )),
        SourceKind::Binance => Box::new(super::BinanceQuoteStream::new(
            source.id.clone(),
            instrument.clone(),
            url,
        )),
    };
    Ok(stream)
}
