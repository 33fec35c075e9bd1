//! `referee history`: recently persisted opportunities.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::HistoryArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::database::model::OpportunityRow;
use crate::adapter::outbound::sqlite::SqliteOpportunityRepository;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Detected")]
    detected_at: String,
    #[tabled(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Net Profit")]
    net_profit: String,
    #[tabled(rename = "Fees")]
    total_fees: String,
}

impl From<&OpportunityRow> for HistoryRow {
    fn from(row: &OpportunityRow) -> Self {
        Self {
            detected_at: row.detected_at.clone(),
            buy: format!("{} @ {}", row.buy_source, row.buy_price),
            sell: format!("{} @ {}", row.sell_source, row.sell_price),
            net_profit: row.net_profit.clone(),
            total_fees: row.total_fees.clone(),
        }
    }
}

/// Show the most recent opportunities, newest first.
pub fn execute(args: &HistoryArgs) -> Result<()> {
    if args.limit <= 0 {
        return Err(ConfigError::InvalidValue {
            field: "limit",
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }

    let database = match &args.database {
        Some(path) => path.to_string_lossy().to_string(),
        None => Config::load(&args.config)?.database,
    };

    let repo = SqliteOpportunityRepository::open(&database)?;
    let total = repo.count()?;
    let rows = repo.recent(args.limit)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history",
            "total": total,
            "opportunities": rows
                .iter()
                .map(|r| json!({
                    "id": r.opportunity_id,
                    "detected_at": r.detected_at,
                    "instrument": r.instrument,
                    "buy_source": r.buy_source,
                    "sell_source": r.sell_source,
                    "buy_price": r.buy_price,
                    "sell_price": r.sell_price,
                    "volume": r.volume,
                    "gross_profit": r.gross_profit,
                    "total_fees": r.total_fees,
                    "net_profit": r.net_profit,
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Opportunity history");
    output::field("Database", &database);
    output::field("Total", total);

    if rows.is_empty() {
        output::hint("no opportunities recorded yet");
        return Ok(());
    }

    let table = Table::new(rows.iter().map(HistoryRow::from)).to_string();
    output::lines(&table);
    Ok(())
}
