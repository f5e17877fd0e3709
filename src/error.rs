use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// A required field is missing or could not be coerced to its type.
    #[error("{0}")]
    Validation(String),
    #[error("Item {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Operation(#[from] DbErr),
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
