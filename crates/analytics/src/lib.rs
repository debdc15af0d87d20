//! # GBCE Pricing Engine
//!
//! This crate derives the market metrics of the exchange: dividend yield and
//! P/E ratio for a quoted price, the volume-weighted stock price (VWSP) over a
//! recent trade window, and the GBCE All Share Index.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** The `PricingEngine` holds no state. Catalogue entries,
//!   quotes and the trade ledger are passed in; metrics come out.
//! - **Explicit Absence:** Missing data is never papered over with zeroes. A
//!   stock without recent trades yields `PricingError::NoRecentTrades`, and the
//!   caller (or `MissingDataPolicy`) decides what to do about it.
//!
//! ## Public API
//!
//! - `PricingEngine`: The struct that contains the calculation logic.
//! - `MarketReport` / `StockReport`: The per-stock and market-wide results.
//! - `PricingError`: The specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::{INDEX_DP, PRICE_DP, PricingEngine};
pub use error::PricingError;
pub use report::{MarketReport, MissingDataPolicy, StockReport};
