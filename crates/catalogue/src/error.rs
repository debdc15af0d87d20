use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("Stock not found in catalogue: {0}")]
    NotFound(String),

    #[error("Stock '{0}' is defined more than once")]
    DuplicateSymbol(String),

    #[error("Invalid stock definition: {0}")]
    InvalidDefinition(#[from] CoreError),
}
