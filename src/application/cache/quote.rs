//! Thread-safe latest-quote store.
//!
//! Holds at most one quote per source (last write wins). Readers take a
//! point-in-time [`QuoteSnapshot`] and scan it without holding the lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{id::SourceId, quote::Quote};

/// A stored quote together with the time the store received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuote {
    quote: Quote,
    received_at: DateTime<Utc>,
}

impl StoredQuote {
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Reference time for staleness: the source's own timestamp when it
    /// supplied one, otherwise the receive time.
    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.quote.timestamp().unwrap_or(self.received_at)
    }

    fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => now - self.as_of() <= max_age,
            // Out-of-range windows never expire anything.
            Err(_) => true,
        }
    }
}

/// Owned copy of the store contents at one instant.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    entries: HashMap<SourceId, StoredQuote>,
}

impl QuoteSnapshot {
    /// Drop entries whose age at `now` exceeds `max_age`.
    #[must_use]
    pub fn fresh(self, now: DateTime<Utc>, max_age: Duration) -> Self {
        let entries = self
            .entries
            .into_iter()
            .filter(|(_, entry)| entry.is_fresh(now, max_age))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, source: &SourceId) -> Option<&Quote> {
        self.entries.get(source).map(StoredQuote::quote)
    }

    /// Iterate quotes. Order is unspecified.
    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.entries.values().map(StoredQuote::quote)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SourceId, &StoredQuote)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Quote> for QuoteSnapshot {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        let received_at = Utc::now();
        let entries = iter
            .into_iter()
            .map(|quote| (quote.source().clone(), StoredQuote { quote, received_at }))
            .collect();
        Self { entries }
    }
}

/// Latest quote per source, safe for concurrent writers and readers.
pub struct QuoteStore {
    quotes: RwLock<HashMap<SourceId, StoredQuote>>,
}

impl QuoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
        }
    }

    /// Record `quote` as the latest for its source, replacing any prior entry.
    pub fn update(&self, quote: Quote) {
        self.update_at(quote, Utc::now());
    }

    /// Same as [`update`](Self::update) with an explicit receive time.
    pub fn update_at(&self, quote: Quote, received_at: DateTime<Utc>) {
        let source = quote.source().clone();
        self.quotes
            .write()
            .insert(source, StoredQuote { quote, received_at });
    }

    /// Copy the current contents. The lock is released before returning.
    #[must_use]
    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            entries: self.quotes.read().clone(),
        }
    }

    /// Latest quote for one source.
    #[must_use]
    pub fn get(&self, source: &SourceId) -> Option<Quote> {
        self.quotes.read().get(source).map(|e| e.quote.clone())
    }

    /// Number of sources with a quote.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.read().len()
    }

    /// Returns true if no source has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn quote(source: &str, bid: Decimal, ask: Decimal) -> Quote {
        Quote::new(source, "BTC/EUR", bid, ask)
    }

    #[test]
    fn test_update_and_get() {
        let store = QuoteStore::new();
        store.update(quote("kraken", dec!(60000), dec!(60050)));

        let retrieved = store.get(&SourceId::from("kraken")).unwrap();
        assert_eq!(retrieved.bid(), dec!(60000));
        assert_eq!(retrieved.ask(), dec!(60050));
        assert!(store.get(&SourceId::from("binance")).is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = QuoteStore::new();
        store.update(quote("kraken", dec!(60000), dec!(60050)));
        store.update(quote("kraken", dec!(60100), dec!(60150)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&SourceId::from("kraken")).unwrap().bid(), dec!(60100));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_writes() {
        let store = QuoteStore::new();
        store.update(quote("kraken", dec!(60000), dec!(60050)));

        let snapshot = store.snapshot();
        store.update(quote("kraken", dec!(1), dec!(2)));
        store.update(quote("binance", dec!(3), dec!(4)));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&SourceId::from("kraken")).unwrap().bid(), dec!(60000));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_concurrent_updates_keep_last_write_per_source() {
        const SOURCES: usize = 8;
        const WRITES: u32 = 500;

        let store = Arc::new(QuoteStore::new());
        let handles: Vec<_> = (0..SOURCES)
            .map(|s| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let name = format!("source-{s}");
                    for i in 1..=WRITES {
                        let bid = Decimal::from(i);
                        store.update(quote(&name, bid, bid + Decimal::ONE));
                    }
                })
            })
            .collect();

        // Interleave reads with the writers; every entry seen must be whole.
        for _ in 0..100 {
            for q in store.snapshot().quotes() {
                assert_eq!(q.ask() - q.bid(), Decimal::ONE);
            }
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), SOURCES);
        for s in 0..SOURCES {
            let q = snapshot.get(&SourceId::from(format!("source-{s}"))).unwrap();
            assert_eq!(q.bid(), Decimal::from(WRITES));
            assert_eq!(q.source().as_str(), format!("source-{s}"));
        }
    }

    #[test]
    fn test_fresh_drops_old_entries_but_store_keeps_them() {
        let store = QuoteStore::new();
        let now = Utc::now();
        store.update_at(
            quote("kraken", dec!(60000), dec!(60050)),
            now - chrono::Duration::seconds(60),
        );
        store.update_at(quote("binance", dec!(61000), dec!(61050)), now);

        let fresh = store.snapshot().fresh(now, Duration::from_secs(30));
        assert_eq!(fresh.len(), 1);
        assert!(fresh.get(&SourceId::from("binance")).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_source_timestamp_takes_precedence_for_age() {
        let store = QuoteStore::new();
        let now = Utc::now();
        let old = quote("kraken", dec!(60000), dec!(60050))
            .observed_at(now - chrono::Duration::seconds(120));
        store.update_at(old, now);

        let fresh = store.snapshot().fresh(now, Duration::from_secs(30));
        assert!(fresh.is_empty());
    }
}
