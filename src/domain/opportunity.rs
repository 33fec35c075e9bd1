//! Opportunity type with builder pattern.
//!
//! An [`Opportunity`] is a cost-adjusted, strictly profitable buy-low /
//! sell-high pair across two sources. It is immutable once built and carries
//! the prices observed at detection time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

use super::cost::ProfitBreakdown;
use super::id::{InstrumentId, OpportunityId, SourceId};
use super::money::{Price, Volume};

/// Error returned when building an Opportunity fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityBuildError {
    /// Instrument is required but was not provided.
    MissingInstrument,
    /// Buy side is required but was not provided.
    MissingBuyLeg,
    /// Sell side is required but was not provided.
    MissingSellLeg,
    /// Trade notional is required but was not provided.
    MissingNotional,
    /// Cost breakdown is required but was not provided.
    MissingBreakdown,
    /// Both legs name the same source.
    SameSource,
}

impl fmt::Display for OpportunityBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInstrument => write!(f, "instrument is required"),
            Self::MissingBuyLeg => write!(f, "buy source and price are required"),
            Self::MissingSellLeg => write!(f, "sell source and price are required"),
            Self::MissingNotional => write!(f, "trade notional is required"),
            Self::MissingBreakdown => write!(f, "profit breakdown is required"),
            Self::SameSource => write!(f, "buy and sell sources must differ"),
        }
    }
}

impl std::error::Error for OpportunityBuildError {}

/// A detected cross-source arbitrage opportunity.
///
/// Use `Opportunity::builder()` to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opportunity {
    id: OpportunityId,
    instrument: InstrumentId,
    buy_source: SourceId,
    sell_source: SourceId,
    buy_price: Price,
    sell_price: Price,
    trade_notional: Decimal,
    volume: Volume,
    gross_profit: Decimal,
    total_fees: Decimal,
    net_profit: Decimal,
    detected_at: DateTime<Utc>,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::new()
    }

    pub fn id(&self) -> &OpportunityId {
        &self.id
    }

    pub fn instrument(&self) -> &InstrumentId {
        &self.instrument
    }

    /// Source whose ask is bought.
    pub fn buy_source(&self) -> &SourceId {
        &self.buy_source
    }

    /// Source whose bid is hit.
    pub fn sell_source(&self) -> &SourceId {
        &self.sell_source
    }

    pub fn buy_price(&self) -> Price {
        self.buy_price
    }

    pub fn sell_price(&self) -> Price {
        self.sell_price
    }

    /// Fixed quote-currency amount committed per trade.
    pub fn trade_notional(&self) -> Decimal {
        self.trade_notional
    }

    /// Asset quantity (notional / buy price).
    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn gross_profit(&self) -> Decimal {
        self.gross_profit
    }

    pub fn total_fees(&self) -> Decimal {
        self.total_fees
    }

    pub fn net_profit(&self) -> Decimal {
        self.net_profit
    }

    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buy@{} {} -> sell@{} {} net {}",
            self.instrument,
            self.buy_source,
            self.buy_price,
            self.sell_source,
            self.sell_price,
            self.net_profit
        )
    }
}

/// Builder for constructing `Opportunity` instances.
///
/// ```ignore
/// let opportunity = Opportunity::builder()
///     .instrument(instrument)
///     .buy(SourceId::from("kraken"), dec!(60050))
///     .sell(SourceId::from("binance"), dec!(61000))
///     .trade_notional(dec!(1000))
///     .breakdown(breakdown)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    id: Option<OpportunityId>,
    instrument: Option<InstrumentId>,
    buy: Option<(SourceId, Price)>,
    sell: Option<(SourceId, Price)>,
    trade_notional: Option<Decimal>,
    breakdown: Option<ProfitBreakdown>,
    detected_at: Option<DateTime<Utc>>,
}

impl OpportunityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing identifier (e.g. when loading from storage).
    pub fn id(mut self, id: OpportunityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn instrument(mut self, instrument: InstrumentId) -> Self {
        self.instrument = Some(instrument);
        self
    }

    /// Set the buy source and the ask paid there.
    pub fn buy(mut self, source: SourceId, price: Price) -> Self {
        self.buy = Some((source, price));
        self
    }

    /// Set the sell source and the bid received there.
    pub fn sell(mut self, source: SourceId, price: Price) -> Self {
        self.sell = Some((source, price));
        self
    }

    pub fn trade_notional(mut self, notional: Decimal) -> Self {
        self.trade_notional = Some(notional);
        self
    }

    pub fn breakdown(mut self, breakdown: ProfitBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// Override the detection timestamp (defaults to now).
    pub fn detected_at(mut self, at: DateTime<Utc>) -> Self {
        self.detected_at = Some(at);
        self
    }

    /// Build the Opportunity.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if any required field is missing or
    /// both legs name the same source.
    pub fn build(self) -> Result<Opportunity, OpportunityBuildError> {
        let instrument = self
            .instrument
            .ok_or(OpportunityBuildError::MissingInstrument)?;
        let (buy_source, buy_price) = self.buy.ok_or(OpportunityBuildError::MissingBuyLeg)?;
        let (sell_source, sell_price) = self.sell.ok_or(OpportunityBuildError::MissingSellLeg)?;
        let trade_notional = self
            .trade_notional
            .ok_or(OpportunityBuildError::MissingNotional)?;
        let breakdown = self
            .breakdown
            .ok_or(OpportunityBuildError::MissingBreakdown)?;

        if buy_source == sell_source {
            return Err(OpportunityBuildError::SameSource);
        }

        Ok(Opportunity {
            id: self.id.unwrap_or_default(),
            instrument,
            buy_source,
            sell_source,
            buy_price,
            sell_price,
            trade_notional,
            volume: breakdown.volume,
            gross_profit: breakdown.gross_profit,
            total_fees: breakdown.total_fees,
            net_profit: breakdown.net_profit,
            detected_at: self.detected_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cost::evaluate;
    use rust_decimal_macros::dec;

    fn breakdown() -> ProfitBreakdown {
        evaluate(
            dec!(60000),
            dec!(61000),
            dec!(0.26),
            dec!(0.1),
            dec!(1000),
            dec!(5),
        )
        .unwrap()
    }

    fn builder() -> OpportunityBuilder {
        Opportunity::builder()
            .instrument(InstrumentId::from("BTC/EUR"))
            .buy(SourceId::from("kraken"), dec!(60000))
            .sell(SourceId::from("binance"), dec!(61000))
            .trade_notional(dec!(1000))
            .breakdown(breakdown())
    }

    #[test]
    fn builder_copies_breakdown_fields() {
        let opp = builder().build().unwrap();
        let expected = breakdown();

        assert_eq!(opp.buy_source().as_str(), "kraken");
        assert_eq!(opp.sell_source().as_str(), "binance");
        assert_eq!(opp.buy_price(), dec!(60000));
        assert_eq!(opp.sell_price(), dec!(61000));
        assert_eq!(opp.trade_notional(), dec!(1000));
        assert_eq!(opp.volume(), expected.volume);
        assert_eq!(opp.gross_profit(), expected.gross_profit);
        assert_eq!(opp.total_fees(), expected.total_fees);
        assert_eq!(opp.net_profit(), expected.net_profit);
    }

    #[test]
    fn builder_keeps_supplied_id_and_timestamp() {
        let at = Utc::now() - chrono::Duration::seconds(30);
        let id = OpportunityId::from("fixed-id".to_string());
        let opp = builder().id(id.clone()).detected_at(at).build().unwrap();

        assert_eq!(opp.id(), &id);
        assert_eq!(opp.detected_at(), at);
    }

    #[test]
    fn builder_fails_without_buy_leg() {
        let result = Opportunity::builder()
            .instrument(InstrumentId::from("BTC/EUR"))
            .sell(SourceId::from("binance"), dec!(61000))
            .trade_notional(dec!(1000))
            .breakdown(breakdown())
            .build();

        assert_eq!(result.unwrap_err(), OpportunityBuildError::MissingBuyLeg);
    }

    #[test]
    fn builder_rejects_same_source_on_both_legs() {
        let result = builder().sell(SourceId::from("kraken"), dec!(61000)).build();
        assert_eq!(result.unwrap_err(), OpportunityBuildError::SameSource);
    }

    #[test]
    fn error_display_messages() {
        assert_eq!(
            OpportunityBuildError::MissingInstrument.to_string(),
            "instrument is required"
        );
        assert_eq!(
            OpportunityBuildError::SameSource.to_string(),
            "buy and sell sources must differ"
        );
    }
}
