use crate::error::ConfigError;
use catalogue::StockCatalogue;
use chrono::Duration;
use core_types::{StockDefinition, TradeSide};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub market: Market,
    #[serde(default)]
    pub report: Report,
    /// The listing. When empty the GBCE sample listing is used.
    #[serde(default)]
    pub stocks: Vec<StockDefinition>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    /// Trades registered at startup, stamped with the time they are loaded.
    #[serde(default)]
    pub trades: Vec<SeedTrade>,
}

/// Parameters shared by every market calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// Width of the trade window used for volume-weighted prices, in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,
}

fn default_window_secs() -> i64 {
    300
}

impl Default for Market {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// How the market report is rendered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub format: OutputFormat,
    /// Abort the report when a stock has no recent trades instead of skipping it.
    #[serde(default)]
    pub strict: bool,
}

/// A quoted market price for one stock, used for yield and P/E.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedTrade {
    pub symbol: String,
    pub side: TradeSide,
    pub price: Decimal,
    pub quantity: u64,
}

impl Config {
    /// The trade window as a duration.
    ///
    /// Fails when `market.window_secs` is not positive or exceeds what a
    /// `Duration` can hold.
    pub fn window(&self) -> Result<Duration, ConfigError> {
        let secs = self.market.window_secs;
        if secs <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "market.window_secs must be positive, got {}",
                secs
            )));
        }
        Duration::try_seconds(secs).ok_or_else(|| {
            ConfigError::ValidationError(format!("market.window_secs {} is out of range", secs))
        })
    }

    /// Builds the stock catalogue described by this configuration.
    pub fn catalogue(&self) -> Result<StockCatalogue, ConfigError> {
        if self.stocks.is_empty() {
            tracing::debug!("No stocks configured, using the GBCE sample listing.");
            return Ok(StockCatalogue::gbce_sample());
        }
        Ok(StockCatalogue::new(self.stocks.iter().cloned())?)
    }

    /// Quoted prices keyed by symbol. A later quote for the same symbol wins.
    pub fn quote_map(&self) -> BTreeMap<String, Decimal> {
        self.quotes
            .iter()
            .map(|q| (q.symbol.clone(), q.price))
            .collect()
    }

    /// Checks that the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window()?;

        let catalogue = self.catalogue()?;

        for quote in &self.quotes {
            if !catalogue.contains(&quote.symbol) {
                return Err(ConfigError::ValidationError(format!(
                    "quote references unknown stock '{}'",
                    quote.symbol
                )));
            }
            if quote.price <= Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "quote for '{}' must be positive, got {}",
                    quote.symbol, quote.price
                )));
            }
        }

        for trade in &self.trades {
            if !catalogue.contains(&trade.symbol) {
                return Err(ConfigError::ValidationError(format!(
                    "trade references unknown stock '{}'",
                    trade.symbol
                )));
            }
        }

        Ok(())
    }
}
