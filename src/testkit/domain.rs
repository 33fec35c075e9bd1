//! Builders for domain primitives used across tests.
//!
//! Reference pair: kraken at 60000 ask, binance at 61000 bid, fees 0.26% and
//! 0.1%, notional 1000, network fee 5. Net profit is about 8.05.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    cost::CostModel, fee::FeeSchedule, id::InstrumentId, opportunity::Opportunity, quote::Quote,
};

/// Instrument used by every test fixture.
pub const INSTRUMENT: &str = "BTC/EUR";

/// Create a BTC/EUR quote.
pub fn quote(source: &str, bid: Decimal, ask: Decimal) -> Quote {
    Quote::new(source, INSTRUMENT, bid, ask)
}

/// Fee table with the two production sources.
pub fn fees() -> FeeSchedule {
    FeeSchedule::new()
        .with_fee("kraken", dec!(0.26))
        .with_fee("binance", dec!(0.1))
}

/// Notional 1000, network fee 5.
pub fn cost_model() -> CostModel {
    CostModel::new(dec!(1000), dec!(5))
}

/// Profitable opportunity buying at 60000 on `buy` and selling at 61000 on `sell`.
pub fn opportunity(buy: &str, sell: &str) -> Opportunity {
    let model = cost_model();
    let breakdown = model
        .evaluate(dec!(60000), dec!(61000), dec!(0.26), dec!(0.1))
        .expect("positive buy price");

    Opportunity::builder()
        .instrument(InstrumentId::from(INSTRUMENT))
        .buy(buy.into(), dec!(60000))
        .sell(sell.into(), dec!(61000))
        .trade_notional(model.trade_notional())
        .breakdown(breakdown)
        .build()
        .expect("valid opportunity")
}
