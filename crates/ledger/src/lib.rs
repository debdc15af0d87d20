//! # GBCE Trade Ledger
//!
//! The in-memory, append-only log of executed trades. Each listed symbol owns
//! a chronological book of `TradeRecord`s; windowed queries filter the book
//! without ever pruning it.
//!
//! ## Public API
//!
//! - `TradeLedger`: registration and time-windowed retrieval of trades.
//! - `default_window` / `DEFAULT_WINDOW_SECS`: the five-minute pricing window.
//! - `LedgerError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{DEFAULT_WINDOW_SECS, TradeLedger, default_window};
