//! Error types for the event bus.

use shared_bus::PublishError;
use thiserror::Error;

/// Errors returned by [`crate::EventBus`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventBusError {
    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Invalid topic: {0:?}")]
    InvalidTopic(String),
}

/// Errors a [`crate::MessageHandler`] may return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The consumer behind the handler is gone; the subscription is removed.
    #[error("Subscriber disconnected")]
    Disconnected,

    /// Processing failed; logged, the subscription stays active.
    #[error("Handler failed: {0}")]
    Failed(String),
}
