use crate::error::PricingError;
use crate::report::{MarketReport, MissingDataPolicy, StockReport};
use catalogue::StockCatalogue;
use chrono::Duration;
use core_types::{StockClass, StockDefinition, TradeRecord};
use ledger::TradeLedger;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Decimal places kept for yields, P/E ratios and volume-weighted prices.
pub const PRICE_DP: u32 = 2;
/// Decimal places kept for the All Share Index.
pub const INDEX_DP: u32 = 6;

fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(what: &str, symbol: &str) -> PricingError {
    PricingError::Calculation(format!("{} of {} is out of range", what, symbol))
}

/// A stateless calculator for per-stock metrics and the market index.
///
/// Every method is a pure function of its arguments. The only time-dependent
/// input is the ledger, whose clock decides which trades are recent.
#[derive(Debug, Default)]
pub struct PricingEngine {}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dividend yield of `stock` at `price`, rounded to two decimal places.
    ///
    /// * Common: `last_dividend / price`
    /// * Preferred: `(fixed_dividend_pct / 100 * par_value) / price`
    pub fn dividend_yield(
        &self,
        stock: &StockDefinition,
        price: Decimal,
    ) -> Result<Decimal, PricingError> {
        if price <= Decimal::ZERO {
            return Err(PricingError::InvalidPrice(price));
        }

        let dividend = match stock.stock_class {
            StockClass::Common => stock.last_dividend,
            StockClass::Preferred => {
                let pct = stock
                    .fixed_dividend_pct
                    .ok_or_else(|| PricingError::MissingFixedDividend(stock.symbol.clone()))?;
                pct.checked_div(dec!(100))
                    .and_then(|rate| rate.checked_mul(stock.par_value))
                    .ok_or_else(|| overflow("fixed dividend", &stock.symbol))?
            }
        };

        let result = dividend
            .checked_div(price)
            .map(|value| round_to(value, PRICE_DP))
            .ok_or_else(|| overflow("dividend yield", &stock.symbol))?;
        tracing::debug!(
            "Dividend yield for {} ({}) at {}: {}",
            stock.symbol,
            stock.stock_class,
            price,
            result
        );
        Ok(result)
    }

    /// Price/earnings ratio (`price / yield_value`), rounded to two decimal places.
    ///
    /// A zero yield has no meaningful ratio and is reported as `DivisionByZero`.
    pub fn pe_ratio(&self, price: Decimal, yield_value: Decimal) -> Result<Decimal, PricingError> {
        if price <= Decimal::ZERO {
            return Err(PricingError::InvalidPrice(price));
        }
        if yield_value.is_zero() {
            return Err(PricingError::DivisionByZero("pe_ratio".to_string()));
        }

        price
            .checked_div(yield_value)
            .map(|value| round_to(value, PRICE_DP))
            .ok_or_else(|| {
                PricingError::Calculation(format!("P/E of {} over {} overflows", price, yield_value))
            })
    }

    /// Volume-weighted price of the trades for `symbol` inside `window`.
    pub fn volume_weighted_stock_price(
        &self,
        symbol: &str,
        ledger: &TradeLedger,
        window: Duration,
    ) -> Result<Decimal, PricingError> {
        let trades = ledger.relevant_trades(symbol, window)?;
        self.vwsp_of(symbol, &trades)
    }

    /// `sum(price * quantity) / sum(quantity)` over `trades`, rounded to two decimal places.
    pub fn vwsp_of(&self, symbol: &str, trades: &[TradeRecord]) -> Result<Decimal, PricingError> {
        let (traded_value, traded_quantity) = trades
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(value, quantity), trade| {
                let value = trade.notional().and_then(|n| value.checked_add(n))?;
                let quantity = quantity.checked_add(Decimal::from(trade.quantity))?;
                Some((value, quantity))
            })
            .ok_or_else(|| overflow("traded value", symbol))?;

        if traded_quantity.is_zero() {
            return Err(PricingError::NoRecentTrades(symbol.to_string()));
        }

        let vwsp = traded_value
            .checked_div(traded_quantity)
            .map(|value| round_to(value, PRICE_DP))
            .ok_or_else(|| overflow("VWSP", symbol))?;
        tracing::debug!("VWSP for {} over {} trades: {}", symbol, trades.len(), vwsp);
        Ok(vwsp)
    }

    /// Geometric mean of the supplied volume-weighted prices, rounded to six decimal places.
    ///
    /// The mean is taken in log space so that large markets cannot overflow the
    /// running product. All prices should have been computed over the same window.
    pub fn all_share_index(
        &self,
        stocks: &[(StockDefinition, Decimal)],
    ) -> Result<Decimal, PricingError> {
        if stocks.is_empty() {
            return Err(PricingError::EmptyMarket);
        }

        let mut log_sum = 0f64;
        for (stock, vwsp) in stocks {
            if *vwsp <= Decimal::ZERO {
                return Err(PricingError::InvalidPrice(*vwsp));
            }
            let value = vwsp.to_f64().ok_or_else(|| {
                PricingError::Calculation(format!("VWSP of {} is not representable", stock.symbol))
            })?;
            log_sum += value.ln();
        }

        let mean = (log_sum / stocks.len() as f64).exp();
        let index = Decimal::from_f64(mean).ok_or_else(|| {
            PricingError::Calculation(format!("Index value {} is out of range", mean))
        })?;

        let index = round_to(index, INDEX_DP);
        tracing::debug!("All Share Index over {} stocks: {}", stocks.len(), index);
        Ok(index)
    }

    /// Builds the full market report: yield and P/E for every quoted stock,
    /// VWSP for every stock, and the All Share Index over the stocks that have one.
    ///
    /// The ledger clock is read once; every stock is windowed from that instant,
    /// which is also the report's `generated_at`.
    pub fn market_report(
        &self,
        catalogue: &StockCatalogue,
        ledger: &TradeLedger,
        quotes: &BTreeMap<String, Decimal>,
        window: Duration,
        policy: MissingDataPolicy,
    ) -> Result<MarketReport, PricingError> {
        let now = ledger.now();
        let mut stocks = Vec::with_capacity(catalogue.len());
        let mut index_inputs = Vec::new();

        for stock in catalogue.iter() {
            let price = quotes.get(&stock.symbol).copied();

            let (dividend_yield, pe_ratio) = match price {
                Some(price) => {
                    let dividend_yield = self.dividend_yield(stock, price)?;
                    let pe_ratio = match self.pe_ratio(price, dividend_yield) {
                        Ok(ratio) => Some(ratio),
                        Err(PricingError::DivisionByZero(_)) => None,
                        Err(e) => return Err(e),
                    };
                    (Some(dividend_yield), pe_ratio)
                }
                None => (None, None),
            };

            let trades = ledger.relevant_trades_at(&stock.symbol, now, window)?;
            let vwsp = match self.vwsp_of(&stock.symbol, &trades) {
                Ok(vwsp) => {
                    index_inputs.push((stock.clone(), vwsp));
                    Some(vwsp)
                }
                Err(PricingError::NoRecentTrades(symbol)) => match policy {
                    MissingDataPolicy::Abort => return Err(PricingError::NoRecentTrades(symbol)),
                    MissingDataPolicy::Skip => {
                        tracing::warn!(symbol = %symbol, "No recent trades, excluding from index.");
                        None
                    }
                },
                Err(e) => return Err(e),
            };

            stocks.push(StockReport {
                symbol: stock.symbol.clone(),
                stock_class: stock.stock_class,
                price,
                dividend_yield,
                pe_ratio,
                vwsp,
                recent_trades: trades.len(),
            });
        }

        let all_share_index = match policy {
            MissingDataPolicy::Skip if index_inputs.is_empty() => {
                tracing::warn!("No stock traded inside the window; All Share Index unavailable.");
                None
            }
            _ => Some(self.all_share_index(&index_inputs)?),
        };

        Ok(MarketReport {
            generated_at: now,
            window_secs: window.num_seconds(),
            stocks,
            all_share_index,
        })
    }
}
