//! # Event Bus Service
//!
//! Topic/channel publish-subscribe on top of a [`MessageBroker`].
//!
//! Each subscription owns a broker stream and a tokio task that drains it
//! into the subscriber's handler, so a slow handler only delays itself.

use shared_bus::{
    agent_topic, is_valid_topic, BrokerHealth, BusMessage, BusPayload, MessageBroker,
    MessageStream, PostEventKind, TopicPattern, SYSTEM_TOPIC,
};
use shared_types::{Post, SystemTimeSource, TimeSource};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use crate::domain::{post_topics, SubscriptionEntry, SubscriptionHandle, SubscriptionRegistry};
use crate::error::{EventBusError, HandlerError};
use crate::ports::MessageHandler;

/// Sender recorded on system events.
pub const SYSTEM_SENDER: &str = "system";

struct BusInner {
    broker: Arc<dyn MessageBroker>,
    registry: SubscriptionRegistry,
    time: Arc<dyn TimeSource>,
}

/// Event bus handle. Clones share the same registry and broker.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

/// Non-owning [`EventBus`] handle, for handlers that must reach back into
/// their own bus.
#[derive(Clone)]
pub struct WeakEventBus {
    inner: Weak<BusInner>,
}

impl WeakEventBus {
    pub fn upgrade(&self) -> Option<EventBus> {
        self.inner.upgrade().map(|inner| EventBus { inner })
    }
}

impl EventBus {
    pub fn new(broker: Arc<dyn MessageBroker>) -> Self {
        Self::with_time_source(broker, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(broker: Arc<dyn MessageBroker>, time: Arc<dyn TimeSource>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                broker,
                registry: SubscriptionRegistry::new(),
                time,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakEventBus {
        WeakEventBus {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Register `handler` for messages on `topic`.
    ///
    /// `topic` may be an exact topic or a trailing-`*` pattern. With a
    /// `channel_filter`, only messages tagged with that channel are handed
    /// to the handler. Messages published after this returns are delivered.
    ///
    /// Must be called inside a tokio runtime.
    pub fn subscribe(
        &self,
        topic: &str,
        channel_filter: Option<String>,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionHandle, EventBusError> {
        let base = topic.strip_suffix('*').unwrap_or(topic);
        if topic != "*" && !is_valid_topic(base) {
            return Err(EventBusError::InvalidTopic(topic.to_string()));
        }

        let stream = self.inner.broker.subscribe(TopicPattern::parse(topic));
        let entry = self.inner.registry.register(topic, channel_filter);
        let handle = entry.handle.clone();

        let task = tokio::spawn(run_subscription(
            Arc::clone(&entry),
            stream,
            handler,
            Arc::downgrade(&self.inner),
        ));
        entry.attach_task(task);

        debug!(
            subscription = %handle.id,
            topic = %handle.topic,
            channel = ?handle.channel_filter,
            "Subscribed"
        );
        Ok(handle)
    }

    /// Remove a subscription.
    ///
    /// Idempotent: returns `false` if it was already removed. No message
    /// dequeued after this returns reaches the handler. A message that had
    /// already passed the delivery task's active check is in flight and may
    /// still be handled; use [`Self::unsubscribe_and_wait`] to wait for it.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let removed = self.inner.registry.remove(handle.id).is_some();
        if removed {
            debug!(subscription = %handle.id, topic = %handle.topic, "Unsubscribed");
        }
        removed
    }

    /// Remove a subscription and wait for any in-flight handler call.
    ///
    /// Once this returns, the handler is neither running nor invoked again.
    /// Must not be awaited from inside the same subscription's handler.
    pub async fn unsubscribe_and_wait(&self, handle: &SubscriptionHandle) -> bool {
        let Some(entry) = self.inner.registry.remove(handle.id) else {
            return false;
        };
        entry.quiesce().await;
        debug!(subscription = %handle.id, topic = %handle.topic, "Unsubscribed after in-flight delivery");
        true
    }

    /// Publish a post event on every topic the post routes to.
    ///
    /// # Returns
    ///
    /// Total local deliveries across those topics.
    pub async fn publish_post_event(
        &self,
        kind: PostEventKind,
        post: &Post,
    ) -> Result<usize, EventBusError> {
        let now = self.inner.time.now();
        let mut reached = 0;

        for topic in post_topics(post) {
            let message = BusMessage::new(
                topic,
                post.channel_id.clone(),
                post.sender_id.clone(),
                BusPayload::PostEvent {
                    kind,
                    post: post.clone(),
                },
                now,
            );
            reached += self.inner.broker.publish(message).await?;
        }

        debug!(post_id = post.id, kind = ?kind, receivers = reached, "Post event published");
        Ok(reached)
    }

    /// Send a message on the recipient's reserved topic.
    pub async fn publish_directed(
        &self,
        sender_id: &str,
        recipient_id: &str,
        body: serde_json::Value,
    ) -> Result<usize, EventBusError> {
        if recipient_id.is_empty() {
            return Err(EventBusError::InvalidTopic(agent_topic(recipient_id)));
        }
        let message = BusMessage::new(
            agent_topic(recipient_id),
            None,
            sender_id,
            BusPayload::DirectedMessage {
                recipient_id: recipient_id.to_string(),
                body,
            },
            self.inner.time.now(),
        );
        Ok(self.inner.broker.publish(message).await?)
    }

    pub async fn publish_system(
        &self,
        kind: &str,
        detail: serde_json::Value,
    ) -> Result<usize, EventBusError> {
        let message = BusMessage::new(
            SYSTEM_TOPIC,
            None,
            SYSTEM_SENDER,
            BusPayload::SystemEvent {
                kind: kind.to_string(),
                detail,
            },
            self.inner.time.now(),
        );
        Ok(self.inner.broker.publish(message).await?)
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool {
        self.inner.registry.contains(handle.id)
    }

    pub fn broker_health(&self) -> BrokerHealth {
        self.inner.broker.health()
    }

    /// Remove every subscription and wait for their tasks to finish.
    pub async fn shutdown(&self) {
        let ids = self.inner.registry.ids();
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entry) = self.inner.registry.remove(id) {
                tasks.extend(entry.take_task());
            }
        }
        let count = tasks.len();
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Subscription task ended abnormally");
            }
        }
        info!(subscriptions = count, "Event bus shut down");
    }
}

async fn run_subscription(
    entry: Arc<SubscriptionEntry>,
    mut stream: MessageStream,
    handler: Arc<dyn MessageHandler>,
    bus: Weak<BusInner>,
) {
    let id = entry.handle.id;

    loop {
        let message = tokio::select! {
            biased;
            _ = entry.stopped() => break,
            message = stream.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        let _delivering = entry.begin_delivery().await;
        // Unsubscribe may have landed while this message was being dequeued.
        if !entry.is_active() {
            break;
        }

        if let Some(channel) = &entry.handle.channel_filter {
            if message.channel.as_deref() != Some(channel.as_str()) {
                continue;
            }
        }

        match handler.handle(message).await {
            Ok(()) => {}
            Err(HandlerError::Disconnected) => {
                debug!(subscription = %id, "Subscriber disconnected, removing subscription");
                if let Some(bus) = bus.upgrade() {
                    bus.registry.remove(id);
                }
                break;
            }
            Err(e) => {
                warn!(subscription = %id, topic = %entry.handle.topic, error = %e, "Handler failed");
            }
        }
    }

    stream.close();
    debug!(subscription = %id, "Subscription task stopped");
}
