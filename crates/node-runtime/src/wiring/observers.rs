//! Logs alert and system traffic so operators see it without a client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ag_01_event_bus::{EventBus, EventBusError, HandlerError, MessageHandler, SubscriptionHandle};
use async_trait::async_trait;
use shared_bus::{BusMessage, BusPayload, ALERTS_TOPIC, SYSTEM_TOPIC};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct SystemObserver {
    observed: AtomicU64,
}

impl SystemObserver {
    /// Subscribe a new observer to the alerts and system topics.
    pub fn attach(bus: &EventBus) -> Result<(Arc<Self>, Vec<SubscriptionHandle>), EventBusError> {
        let observer = Arc::new(Self::default());
        let handler: Arc<dyn MessageHandler> = observer.clone();
        let handles = [ALERTS_TOPIC, SYSTEM_TOPIC]
            .into_iter()
            .map(|topic| bus.subscribe(topic, None, Arc::clone(&handler)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((observer, handles))
    }

    pub fn observed(&self) -> u64 {
        self.observed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessageHandler for SystemObserver {
    async fn handle(&self, message: Arc<BusMessage>) -> Result<(), HandlerError> {
        self.observed.fetch_add(1, Ordering::Relaxed);
        match &message.payload {
            BusPayload::PostEvent { post, .. } => warn!(
                post_id = post.id,
                sender_id = %post.sender_id,
                channel = ?post.channel_id,
                "Alert posted"
            ),
            BusPayload::SystemEvent { kind, detail } => {
                info!(kind = %kind, detail = %detail, "System event")
            }
            BusPayload::DirectedMessage { .. } => {}
        }
        Ok(())
    }
}
