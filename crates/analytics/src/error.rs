use ledger::LedgerError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("Preferred stock '{0}' has no fixed dividend percentage")]
    MissingFixedDividend(String),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(String),

    #[error("No trades for '{0}' inside the pricing window")]
    NoRecentTrades(String),

    #[error("Cannot compute an index over an empty market")]
    EmptyMarket,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
