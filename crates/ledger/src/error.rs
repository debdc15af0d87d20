use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No trade book exists for symbol: {0}")]
    UnknownSymbol(String),

    #[error("Trade price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("Trade quantity must be positive")]
    InvalidQuantity,

    #[error("Trade ledger lock was poisoned by a panicking writer")]
    LockPoisoned,
}
