//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::opportunities;
use crate::domain::opportunity::Opportunity;

/// Database row for an opportunity (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = opportunities)]
pub struct NewOpportunityRow {
    pub opportunity_id: String,
    pub detected_at: String,
    pub instrument: String,
    pub buy_source: String,
    pub sell_source: String,
    pub buy_price: String,
    pub sell_price: String,
    pub trade_notional: String,
    pub volume: String,
    pub gross_profit: String,
    pub total_fees: String,
    pub net_profit: String,
}

impl From<&Opportunity> for NewOpportunityRow {
    fn from(opp: &Opportunity) -> Self {
        Self {
            opportunity_id: opp.id().to_string(),
            detected_at: opp.detected_at().to_rfc3339(),
            instrument: opp.instrument().to_string(),
            buy_source: opp.buy_source().to_string(),
            sell_source: opp.sell_source().to_string(),
            buy_price: opp.buy_price().to_string(),
            sell_price: opp.sell_price().to_string(),
            trade_notional: opp.trade_notional().to_string(),
            volume: opp.volume().to_string(),
            gross_profit: opp.gross_profit().to_string(),
            total_fees: opp.total_fees().to_string(),
            net_profit: opp.net_profit().to_string(),
        }
    }
}

/// Database row for an opportunity (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = opportunities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OpportunityRow {
    pub id: i32,
    pub opportunity_id: String,
    pub detected_at: String,
    pub instrument: String,
    pub buy_source: String,
    pub sell_source: String,
    pub buy_price: String,
    pub sell_price: String,
    pub trade_notional: String,
    pub volume: String,
    pub gross_profit: String,
    pub total_fees: String,
    pub net_profit: String,
}
