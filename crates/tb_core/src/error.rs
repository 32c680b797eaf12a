use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BoardError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            BoardError::Store(err) => err.is_recoverable(),
            BoardError::Config(_) => false,
            BoardError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
