//! # GBCE Stock Catalogue
//!
//! The static listing of every tradable stock and its dividend attributes.
//! Built once at startup from configuration and read-only afterwards, so it can
//! be shared freely between threads.

pub mod catalogue;
pub mod error;

pub use catalogue::StockCatalogue;
pub use error::CatalogueError;
