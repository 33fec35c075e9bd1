//! Cross-source opportunity detection.
//!
//! Compares every unordered pair of sources in a snapshot, in both
//! directions, and keeps the directions where buying at one source's ask and
//! selling at the other's bid nets a strictly positive profit after fees.
//! Source counts are small, so the scan is a plain O(n²) loop.

use tracing::{debug, error, trace, warn};

use crate::application::cache::QuoteSnapshot;
use crate::domain::{
    cost::CostModel,
    error::DomainError,
    fee::FeeSchedule,
    id::{InstrumentId, SourceId},
    money::Price,
    opportunity::Opportunity,
    quote::Quote,
};

/// One direction of a source pair where `buy_price < sell_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub buy_source: SourceId,
    pub sell_source: SourceId,
    /// Ask on the buy source.
    pub buy_price: Price,
    /// Bid on the sell source.
    pub sell_price: Price,
}

/// Finds profitable cross-source pairs in a quote snapshot.
#[derive(Debug, Clone)]
pub struct OpportunityDetector {
    instrument: InstrumentId,
    fees: FeeSchedule,
    cost: CostModel,
}

impl OpportunityDetector {
    #[must_use]
    pub fn new(instrument: InstrumentId, fees: FeeSchedule, cost: CostModel) -> Self {
        Self {
            instrument,
            fees,
            cost,
        }
    }

    pub fn instrument(&self) -> &InstrumentId {
        &self.instrument
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    /// All directions where one source's ask is strictly below another's bid.
    ///
    /// A crossed pair can produce both directions. Quotes with a
    /// non-positive ask are never used as the buy side.
    #[must_use]
    pub fn candidates(&self, snapshot: &QuoteSnapshot) -> Vec<Candidate> {
        let quotes: Vec<&Quote> = snapshot.quotes().collect();
        let mut candidates = Vec::new();

        for (i, a) in quotes.iter().enumerate() {
            for b in &quotes[i + 1..] {
                if let Some(candidate) = Self::direction(a, b) {
                    candidates.push(candidate);
                }
                if let Some(candidate) = Self::direction(b, a) {
                    candidates.push(candidate);
                }
            }
        }

        candidates
    }

    fn direction(buy: &Quote, sell: &Quote) -> Option<Candidate> {
        if buy.ask() <= Price::ZERO || buy.ask() >= sell.bid() {
            return None;
        }
        Some(Candidate {
            buy_source: buy.source().clone(),
            sell_source: sell.source().clone(),
            buy_price: buy.ask(),
            sell_price: sell.bid(),
        })
    }

    /// Evaluate one candidate; `Some` only if strictly profitable.
    #[must_use]
    pub fn evaluate(&self, candidate: &Candidate) -> Option<Opportunity> {
        let Some(buy_fee) = self.fees.taker_fee(&candidate.buy_source) else {
            debug!(source = %candidate.buy_source, "No taker fee configured, skipping");
            return None;
        };
        let Some(sell_fee) = self.fees.taker_fee(&candidate.sell_source) else {
            debug!(source = %candidate.sell_source, "No taker fee configured, skipping");
            return None;
        };

        let breakdown = match self.cost.evaluate(
            candidate.buy_price,
            candidate.sell_price,
            buy_fee,
            sell_fee,
        ) {
            Ok(breakdown) => breakdown,
            Err(e @ DomainError::Overflow { .. }) => {
                warn!(
                    error = %e,
                    buy_source = %candidate.buy_source,
                    sell_source = %candidate.sell_source,
                    buy_price = %candidate.buy_price,
                    sell_price = %candidate.sell_price,
                    "Quote prices out of range, dropping candidate"
                );
                return None;
            }
            Err(e) => {
                error!(
                    error = %e,
                    buy_source = %candidate.buy_source,
                    sell_source = %candidate.sell_source,
                    buy_price = %candidate.buy_price,
                    "Cost model precondition violated"
                );
                debug_assert!(
                    candidate.buy_price > Price::ZERO,
                    "candidate reached cost model with invalid price: {e}"
                );
                return None;
            }
        };

        trace!(
            buy_source = %candidate.buy_source,
            sell_source = %candidate.sell_source,
            net_profit = %breakdown.net_profit,
            "Evaluated candidate"
        );

        if !breakdown.is_profitable() {
            return None;
        }

        Opportunity::builder()
            .instrument(self.instrument.clone())
            .buy(candidate.buy_source.clone(), candidate.buy_price)
            .sell(candidate.sell_source.clone(), candidate.sell_price)
            .trade_notional(self.cost.trade_notional())
            .breakdown(breakdown)
            .build()
            .map_err(|e| {
                error!(
                    error = %e,
                    buy_source = %candidate.buy_source,
                    sell_source = %candidate.sell_source,
                    "Failed to build opportunity from profitable candidate"
                );
            })
            .ok()
    }

    /// Every strictly profitable direction in the snapshot.
    ///
    /// All are returned; there is no best-pick selection. Order follows the
    /// snapshot's iteration order and is not meaningful.
    #[must_use]
    pub fn detect(&self, snapshot: &QuoteSnapshot) -> Vec<Opportunity> {
        self.candidates(snapshot)
            .iter()
            .filter_map(|candidate| self.evaluate(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn detector() -> OpportunityDetector {
        OpportunityDetector::new(
            InstrumentId::from("BTC/EUR"),
            FeeSchedule::new()
                .with_fee("kraken", dec!(0.26))
                .with_fee("binance", dec!(0.1))
                .with_fee("bitstamp", dec!(0.2)),
            CostModel::new(dec!(1000), dec!(5)),
        )
    }

    fn quote(source: &str, bid: Decimal, ask: Decimal) -> Quote {
        Quote::new(source, "BTC/EUR", bid, ask)
    }

    fn directions(opps: &[Opportunity]) -> HashSet<(String, String)> {
        opps.iter()
            .map(|o| (o.buy_source().to_string(), o.sell_source().to_string()))
            .collect()
    }

    #[test]
    fn no_candidates_when_books_overlap() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(60000), dec!(60050)),
            quote("binance", dec!(60010), dec!(60060)),
        ]
        .into_iter()
        .collect();

        assert!(detector().candidates(&snapshot).is_empty());
    }

    #[test]
    fn equal_ask_and_bid_is_not_a_candidate() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(59000), dec!(60000)),
            quote("binance", dec!(60000), dec!(60100)),
        ]
        .into_iter()
        .collect();

        assert!(detector().candidates(&snapshot).is_empty());
    }

    #[test]
    fn profitable_pair_is_detected() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(59950), dec!(60000)),
            quote("binance", dec!(61000), dec!(61050)),
        ]
        .into_iter()
        .collect();

        let opps = detector().detect(&snapshot);
        assert_eq!(opps.len(), 1);

        let opp = &opps[0];
        assert_eq!(opp.buy_source().as_str(), "kraken");
        assert_eq!(opp.sell_source().as_str(), "binance");
        assert_eq!(opp.buy_price(), dec!(60000));
        assert_eq!(opp.sell_price(), dec!(61000));
        assert!((opp.net_profit() - dec!(8.05)).abs() < dec!(0.001));
        assert_eq!(opp.instrument().as_str(), "BTC/EUR");
    }

    #[test]
    fn thin_spread_candidate_is_not_profitable() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(60000), dec!(60001)),
            quote("binance", dec!(60002), dec!(60003)),
        ]
        .into_iter()
        .collect();

        let det = detector();
        assert_eq!(det.candidates(&snapshot).len(), 1);
        assert!(det.detect(&snapshot).is_empty());
    }

    #[test]
    fn crossed_market_evaluates_both_directions() {
        // Each source's ask sits below the other's bid.
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(62000), dec!(60000)),
            quote("binance", dec!(61000), dec!(59000)),
        ]
        .into_iter()
        .collect();

        let det = detector();
        assert_eq!(det.candidates(&snapshot).len(), 2);

        let found = directions(&det.detect(&snapshot));
        let expected: HashSet<_> = [
            ("kraken".to_string(), "binance".to_string()),
            ("binance".to_string(), "kraken".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn crossed_market_emits_only_profitable_direction() {
        // kraken -> binance gap is 1000, binance -> kraken gap is 2.
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(59002), dec!(60000)),
            quote("binance", dec!(61000), dec!(59000)),
        ]
        .into_iter()
        .collect();

        let det = detector();
        assert_eq!(det.candidates(&snapshot).len(), 2);
        let found = directions(&det.detect(&snapshot));
        assert_eq!(found.len(), 1);
        assert!(found.contains(&("kraken".to_string(), "binance".to_string())));
    }

    #[test]
    fn all_profitable_pairs_are_emitted() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(59950), dec!(60000)),
            quote("bitstamp", dec!(59960), dec!(60010)),
            quote("binance", dec!(61000), dec!(61050)),
        ]
        .into_iter()
        .collect();

        let found = directions(&detector().detect(&snapshot));
        let expected: HashSet<_> = [
            ("kraken".to_string(), "binance".to_string()),
            ("bitstamp".to_string(), "binance".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn non_positive_ask_is_never_bought() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", dec!(0), dec!(0)),
            quote("binance", dec!(61000), dec!(61050)),
        ]
        .into_iter()
        .collect();

        assert!(detector().candidates(&snapshot).is_empty());
    }

    #[test]
    fn source_without_fee_is_skipped() {
        let snapshot: QuoteSnapshot = vec![
            quote("unknown", dec!(59950), dec!(60000)),
            quote("binance", dec!(61000), dec!(61050)),
        ]
        .into_iter()
        .collect();

        let det = detector();
        assert_eq!(det.candidates(&snapshot).len(), 1);
        assert!(det.detect(&snapshot).is_empty());
    }

    #[test]
    fn dust_ask_is_dropped_without_panicking() {
        let snapshot: QuoteSnapshot = vec![
            quote("kraken", Decimal::new(1, 27), Decimal::new(1, 27)),
            quote("binance", dec!(61000), dec!(61050)),
        ]
        .into_iter()
        .collect();

        let det = detector();
        assert_eq!(det.candidates(&snapshot).len(), 1);
        assert!(det.detect(&snapshot).is_empty());
    }

    #[test]
    fn same_source_candidate_yields_nothing() {
        let candidate = Candidate {
            buy_source: SourceId::from("kraken"),
            sell_source: SourceId::from("kraken"),
            buy_price: dec!(60000),
            sell_price: dec!(61000),
        };

        assert!(detector().evaluate(&candidate).is_none());
    }

    #[test]
    fn single_source_has_no_pairs() {
        let snapshot: QuoteSnapshot = vec![quote("kraken", dec!(62000), dec!(60000))]
            .into_iter()
            .collect();
        assert!(detector().candidates(&snapshot).is_empty());
    }
}
