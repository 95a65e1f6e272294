//! # Bus Messages
//!
//! Defines the message shape that flows through the broker and the wire
//! envelope used when a message crosses instances.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, Post, Timestamp};
use uuid::Uuid;

use crate::publisher::PublishError;

/// What happened to the post carried by a [`BusPayload::PostEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostEventKind {
    /// A new top-level post was accepted.
    Created,
    /// A reply was accepted; the payload post is the reply itself.
    Replied,
    /// A reaction changed the post's reaction counts.
    Reacted,
}

/// Payload variants carried by the bus.
///
/// Internally tagged with a `type` discriminant so every subscriber decodes
/// explicitly instead of probing field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusPayload {
    PostEvent {
        kind: PostEventKind,
        post: Post,
    },
    DirectedMessage {
        recipient_id: ActorId,
        body: serde_json::Value,
    },
    SystemEvent {
        kind: String,
        detail: serde_json::Value,
    },
}

impl BusPayload {
    /// Discriminant name as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            BusPayload::PostEvent { .. } => "post_event",
            BusPayload::DirectedMessage { .. } => "directed_message",
            BusPayload::SystemEvent { .. } => "system_event",
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            BusPayload::PostEvent { post, .. } => Some(post),
            _ => None,
        }
    }
}

/// A message published on the bus.
///
/// Transient: never persisted by the bus. Delivery is at-most-once per
/// subscriber and FIFO per topic for a single publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub topic: String,
    pub channel: Option<String>,
    pub sender_id: ActorId,
    pub payload: BusPayload,
    pub published_at: Timestamp,
}

impl BusMessage {
    pub fn new(
        topic: impl Into<String>,
        channel: Option<String>,
        sender_id: impl Into<ActorId>,
        payload: BusPayload,
        published_at: Timestamp,
    ) -> Self {
        Self {
            topic: topic.into(),
            channel,
            sender_id: sender_id.into(),
            payload,
            published_at,
        }
    }
}

/// Cross-instance wire format.
///
/// `origin` lets an instance drop its own messages when the distributed
/// broker echoes them back; they were already delivered locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub version: u16,
    pub origin: Uuid,
    pub message: BusMessage,
}

impl WireEnvelope {
    /// Serialize a message for the distributed broker.
    ///
    /// Fails when the payload cannot be encoded or the encoded frame exceeds
    /// `max_bytes`.
    pub fn encode(
        origin: Uuid,
        message: &BusMessage,
        max_bytes: usize,
    ) -> Result<Vec<u8>, PublishError> {
        let envelope = WireEnvelopeRef {
            version: crate::PROTOCOL_VERSION,
            origin,
            message,
        };
        let frame = serde_json::to_vec(&envelope)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;
        if frame.len() > max_bytes {
            return Err(PublishError::PayloadTooLarge {
                size: frame.len(),
                max: max_bytes,
            });
        }
        Ok(frame)
    }

    pub fn decode(frame: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame)
    }
}

/// Borrowing twin of [`WireEnvelope`] so encoding does not clone the message.
#[derive(Serialize)]
struct WireEnvelopeRef<'a> {
    version: u16,
    origin: Uuid,
    message: &'a BusMessage,
}
