//! Transaction cost model for two-leg cross-source trades.
//!
//! Turns a buy/sell price pair into a signed profit figure after both legs'
//! taker fees and a fixed network (withdrawal) fee:
//!
//! ```text
//! volume       = notional / buy_price
//! gross_profit = (sell_price - buy_price) * volume
//! buy_fee      = (buy_price * volume) * (buy_fee_pct / 100)
//! sell_fee     = (sell_price * volume) * (sell_fee_pct / 100)
//! total_fees   = buy_fee + sell_fee + network_fee
//! net_profit   = gross_profit - total_fees
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::money::{FeePct, Price, Volume};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Itemized result of evaluating one buy/sell pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfitBreakdown {
    /// Asset quantity bought with the notional at the buy price.
    pub volume: Volume,
    pub gross_profit: Decimal,
    pub buy_fee: Decimal,
    pub sell_fee: Decimal,
    /// Both taker fees plus the network fee.
    pub total_fees: Decimal,
    pub net_profit: Decimal,
}

impl ProfitBreakdown {
    /// Strictly positive net profit. Break-even is not an opportunity.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }
}

/// Evaluate the cost formulas for one pair.
///
/// Pure and deterministic: identical inputs always give identical output.
///
/// # Errors
///
/// Returns [`DomainError::NonPositiveBuyPrice`] when `buy_price <= 0` and
/// [`DomainError::Overflow`] when an intermediate value leaves the decimal
/// range, e.g. a vanishingly small buy price.
pub fn evaluate(
    buy_price: Price,
    sell_price: Price,
    buy_fee_pct: FeePct,
    sell_fee_pct: FeePct,
    trade_notional: Decimal,
    network_fee: Decimal,
) -> Result<ProfitBreakdown, DomainError> {
    if buy_price <= Decimal::ZERO {
        return Err(DomainError::NonPositiveBuyPrice { price: buy_price });
    }

    let overflow = |step: &'static str| DomainError::Overflow { step };

    let volume = trade_notional
        .checked_div(buy_price)
        .ok_or_else(|| overflow("volume"))?;
    let gross_profit = sell_price
        .checked_sub(buy_price)
        .and_then(|spread| spread.checked_mul(volume))
        .ok_or_else(|| overflow("gross_profit"))?;
    let buy_fee =
        leg_fee(buy_price, volume, buy_fee_pct).ok_or_else(|| overflow("buy_fee"))?;
    let sell_fee =
        leg_fee(sell_price, volume, sell_fee_pct).ok_or_else(|| overflow("sell_fee"))?;
    let total_fees = buy_fee
        .checked_add(sell_fee)
        .and_then(|fees| fees.checked_add(network_fee))
        .ok_or_else(|| overflow("total_fees"))?;
    let net_profit = gross_profit
        .checked_sub(total_fees)
        .ok_or_else(|| overflow("net_profit"))?;

    Ok(ProfitBreakdown {
        volume,
        gross_profit,
        buy_fee,
        sell_fee,
        total_fees,
        net_profit,
    })
}

fn leg_fee(price: Price, volume: Volume, fee_pct: FeePct) -> Option<Decimal> {
    price
        .checked_mul(volume)?
        .checked_mul(fee_pct.checked_div(HUNDRED)?)
}

/// Cost model bound to the fixed trade parameters from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    trade_notional: Decimal,
    network_fee: Decimal,
}

impl CostModel {
    #[must_use]
    pub const fn new(trade_notional: Decimal, network_fee: Decimal) -> Self {
        Self {
            trade_notional,
            network_fee,
        }
    }

    pub fn trade_notional(&self) -> Decimal {
        self.trade_notional
    }

    pub fn network_fee(&self) -> Decimal {
        self.network_fee
    }

    /// Evaluate a pair with this model's notional and network fee.
    ///
    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn evaluate(
        &self,
        buy_price: Price,
        sell_price: Price,
        buy_fee_pct: FeePct,
        sell_fee_pct: FeePct,
    ) -> Result<ProfitBreakdown, DomainError> {
        evaluate(
            buy_price,
            sell_price,
            buy_fee_pct,
            sell_fee_pct,
            self.trade_notional,
            self.network_fee,
        )
    }
}
