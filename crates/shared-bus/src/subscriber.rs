//! # Message Stream
//!
//! Defines the subscription side of the broker.

use crate::events::BusMessage;
use crate::topic::TopicPattern;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The broker was dropped.
    #[error("Broker closed")]
    Closed,
}

/// A subscription's inbound queue.
///
/// Each stream owns an unbounded queue fed by the broker, so a slow consumer
/// never makes the publisher wait and never loses a message it was sent.
/// Dropping the stream closes the queue; the broker prunes it on its next
/// delivery.
pub struct MessageStream {
    receiver: mpsc::UnboundedReceiver<Arc<BusMessage>>,
    pattern: TopicPattern,
    subscriber_id: u64,
}

impl MessageStream {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<Arc<BusMessage>>,
        pattern: TopicPattern,
        subscriber_id: u64,
    ) -> Self {
        Self {
            receiver,
            pattern,
            subscriber_id,
        }
    }

    /// Receive the next message.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next message matching the pattern
    /// - `None` - The broker was dropped
    pub async fn recv(&mut self) -> Option<Arc<BusMessage>> {
        self.receiver.recv().await
    }

    /// Try to receive the next message without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was queued
    /// - `Ok(None)` - Nothing queued right now
    /// - `Err(SubscriptionError::Closed)` - The broker was dropped
    pub fn try_recv(&mut self) -> Result<Option<Arc<BusMessage>>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Stop accepting new messages; already queued ones can still be drained.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    #[must_use]
    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }

    #[must_use]
    pub fn subscriber_id(&self) -> u64 {
        self.subscriber_id
    }
}

impl Stream for MessageStream {
    type Item = Arc<BusMessage>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
