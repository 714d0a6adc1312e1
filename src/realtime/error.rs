// src/realtime/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("Hub is closed")]
    HubClosed,

    #[error("Publish failed on channel {0}")]
    PublishFailed(String),
}

pub type Result<T> = std::result::Result<T, RealtimeError>;
