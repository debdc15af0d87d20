pub mod clock;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use clock::{Clock, ManualClock, SystemClock};
pub use enums::{StockClass, TradeSide};
pub use error::CoreError;
pub use structs::{StockDefinition, TradeRecord};
