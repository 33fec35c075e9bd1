//! Normalized top-of-book quote from a single price source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::{InstrumentId, SourceId};
use super::money::Price;

/// A bid/ask observation from one source at one point in time.
///
/// Immutable once constructed. `bid <= ask` is expected but not enforced:
/// a crossed quote simply never yields a profitable direction on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    source: SourceId,
    instrument: InstrumentId,
    bid: Price,
    ask: Price,
    observed_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Create a quote without a source-side timestamp.
    pub fn new(
        source: impl Into<SourceId>,
        instrument: impl Into<InstrumentId>,
        bid: Price,
        ask: Price,
    ) -> Self {
        Self {
            source: source.into(),
            instrument: instrument.into(),
            bid,
            ask,
            observed_at: None,
        }
    }

    /// Attach the time at which the source observed this quote.
    #[must_use]
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn instrument(&self) -> &InstrumentId {
        &self.instrument
    }

    pub fn bid(&self) -> Price {
        self.bid
    }

    pub fn ask(&self) -> Price {
        self.ask
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.observed_at
    }

    /// Ask minus bid. Negative for a crossed quote.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}
