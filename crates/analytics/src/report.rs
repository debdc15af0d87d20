use chrono::{DateTime, Utc};
use core_types::StockClass;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What `market_report` does when a stock has no trades inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingDataPolicy {
    /// Report the stock without a VWSP and leave it out of the index.
    #[default]
    Skip,
    /// Fail the whole report with `PricingError::NoRecentTrades`.
    Abort,
}

/// Metrics for a single listed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub symbol: String,
    pub stock_class: StockClass,
    pub price: Option<Decimal>,     // None when no quote was supplied
    pub dividend_yield: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,  // None when unquoted or the yield is zero
    pub vwsp: Option<Decimal>,      // None when no trades fall inside the window
    pub recent_trades: usize,
}

/// Per-stock metrics plus the All Share Index, all computed against one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    pub window_secs: i64,
    pub stocks: Vec<StockReport>,
    pub all_share_index: Option<Decimal>,
}

impl MarketReport {
    pub fn stock(&self, symbol: &str) -> Option<&StockReport> {
        self.stocks.iter().find(|s| s.symbol == symbol)
    }
}
