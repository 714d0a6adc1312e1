// src/utils/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Alert error: {0}")]
    Alert(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Realtime error: {0}")]
    Realtime(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Init error: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;

impl From<crate::storage::errors::StorageError> for NodeError {
    fn from(error: crate::storage::errors::StorageError) -> Self {
        NodeError::Storage(error.to_string())
    }
}

impl From<crate::realtime::error::RealtimeError> for NodeError {
    fn from(error: crate::realtime::error::RealtimeError) -> Self {
        NodeError::Realtime(error.to_string())
    }
}
