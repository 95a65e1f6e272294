//! Reputation notifier adapters.

use ag_01_event_bus::EventBus;
use async_trait::async_trait;

use crate::ports::{Interaction, InteractionNotifier, NotifyError};

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

#[async_trait]
impl InteractionNotifier for NoOpNotifier {
    async fn positive_interaction(&self, _interaction: Interaction) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Publishes interactions as `reputation.interaction` system events for an
/// out-of-process reputation service to consume.
pub struct BusInteractionNotifier {
    bus: EventBus,
}

impl BusInteractionNotifier {
    pub const EVENT_KIND: &'static str = "reputation.interaction";

    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl InteractionNotifier for BusInteractionNotifier {
    async fn positive_interaction(&self, interaction: Interaction) -> Result<(), NotifyError> {
        let detail =
            serde_json::to_value(&interaction).map_err(|e| NotifyError(e.to_string()))?;
        self.bus
            .publish_system(Self::EVENT_KIND, detail)
            .await
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}
