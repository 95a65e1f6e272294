//! # WebSocket Bridge
//!
//! Forwards bus messages to one connected client as JSON text frames.
//!
//! The bridge owns no socket. The socket layer hands it the sending half of
//! a bounded queue and writes whatever comes out of the other half.
//!
//! - Queue full: the frame is dropped for this client only.
//! - Queue closed: all of the bridge's subscriptions are torn down at once.

use async_trait::async_trait;
use serde::Serialize;
use shared_bus::{agent_topic, BusMessage, BusPayload};
use shared_types::{ActorId, Timestamp};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::SubscriptionHandle;
use crate::error::{EventBusError, HandlerError};
use crate::ports::MessageHandler;
use crate::service::{EventBus, WeakEventBus};

/// A frame pushed to a socket client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundFrame<'a> {
    pub topic: &'a str,
    pub channel: Option<&'a str>,
    pub sender_id: &'a ActorId,
    pub published_at: Timestamp,
    pub payload: &'a BusPayload,
}

impl<'a> OutboundFrame<'a> {
    pub fn from_message(message: &'a BusMessage) -> Self {
        Self {
            topic: &message.topic,
            channel: message.channel.as_deref(),
            sender_id: &message.sender_id,
            published_at: message.published_at,
            payload: &message.payload,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Per-client delivery counters.
#[derive(Debug, Default)]
pub struct BridgeStats {
    pub frames_sent: AtomicU64,
    pub frames_dropped: AtomicU64,
}

/// Shared between every subscription of one client.
struct ClientLink {
    client_id: String,
    frames: mpsc::Sender<String>,
    stats: BridgeStats,
    bus: WeakEventBus,
    handles: Mutex<Vec<SubscriptionHandle>>,
    closed: AtomicBool,
}

impl ClientLink {
    /// Unsubscribe every handle; returns how many were still live.
    fn release(&self, bus: &EventBus) -> usize {
        let handles = std::mem::take(&mut *self.handles.lock());
        handles.iter().filter(|h| bus.unsubscribe(h)).count()
    }

    fn on_closed(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            let removed = self.release(&bus);
            debug!(client = %self.client_id, removed, "Client queue closed, bridge detached");
        }
    }
}

#[async_trait]
impl MessageHandler for ClientLink {
    async fn handle(&self, message: Arc<BusMessage>) -> Result<(), HandlerError> {
        let frame = OutboundFrame::from_message(&message)
            .to_json()
            .map_err(|e| HandlerError::Failed(e.to_string()))?;

        match self.frames.try_send(frame) {
            Ok(()) => {
                self.stats.frames_sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.stats.frames_dropped.fetch_add(1, Ordering::Relaxed);
                warn!(client = %self.client_id, topic = %message.topic, "Client queue full, dropping frame");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.on_closed();
                Err(HandlerError::Disconnected)
            }
        }
    }
}

/// Subscriptions feeding one socket client.
///
/// Dropping the bridge detaches it. A closed client queue detaches every
/// subscription the first time any of them tries to deliver.
pub struct WebSocketBridge {
    bus: EventBus,
    link: Arc<ClientLink>,
}

impl WebSocketBridge {
    /// Subscribe `client_id` to `topics` plus its own directed topic.
    ///
    /// Must be called inside a tokio runtime.
    pub fn attach(
        bus: &EventBus,
        client_id: impl Into<String>,
        topics: &[String],
        frames: mpsc::Sender<String>,
    ) -> Result<Self, EventBusError> {
        let link = Arc::new(ClientLink {
            client_id: client_id.into(),
            frames,
            stats: BridgeStats::default(),
            bus: bus.downgrade(),
            handles: Mutex::new(Vec::with_capacity(topics.len() + 1)),
            closed: AtomicBool::new(false),
        });
        let bridge = Self {
            bus: bus.clone(),
            link: Arc::clone(&link),
        };

        let directed = agent_topic(&link.client_id);
        for topic in topics.iter().map(String::as_str).chain(std::iter::once(directed.as_str())) {
            // On error the partially attached bridge is dropped, which detaches it.
            let handler: Arc<dyn MessageHandler> = link.clone();
            let handle = bus.subscribe(topic, None, handler)?;
            link.handles.lock().push(handle);
        }

        debug!(client = %link.client_id, topics = link.handles.lock().len(), "WebSocket bridge attached");
        Ok(bridge)
    }

    pub fn client_id(&self) -> &str {
        &self.link.client_id
    }

    /// True while the client queue is open and a subscription is still live.
    pub fn is_attached(&self) -> bool {
        !self.link.closed.load(Ordering::Acquire)
            && self.link.handles.lock().iter().any(|h| self.bus.is_subscribed(h))
    }

    pub fn frames_sent(&self) -> u64 {
        self.link.stats.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.link.stats.frames_dropped.load(Ordering::Relaxed)
    }

    /// Remove every subscription; returns how many were still live.
    pub fn detach(&mut self) -> usize {
        let removed = self.link.release(&self.bus);
        if removed > 0 {
            debug!(client = %self.link.client_id, removed, "WebSocket bridge detached");
        }
        removed
    }
}

impl Drop for WebSocketBridge {
    fn drop(&mut self) {
        self.detach();
    }
}
