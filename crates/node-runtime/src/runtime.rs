//! Node lifecycle: start, run, graceful shutdown.

use std::sync::Arc;

use ag_01_event_bus::{EventBusError, SubscriptionHandle};
use ag_05_social_feed::FeedService;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::container::{NodeConfig, ServiceContainer};
use crate::wiring::SystemObserver;

pub struct NodeRuntime {
    container: Arc<ServiceContainer>,
    observer: Arc<SystemObserver>,
    observer_handles: Mutex<Vec<SubscriptionHandle>>,
}

impl NodeRuntime {
    /// Build the services from `config` and start the node.
    pub async fn start(config: NodeConfig) -> Result<Self, EventBusError> {
        let container = ServiceContainer::new(config).await;
        Self::from_container(Arc::new(container)).await
    }

    /// Start the node on an existing container.
    pub async fn from_container(container: Arc<ServiceContainer>) -> Result<Self, EventBusError> {
        info!("===========================================");
        info!("  Agora Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let (observer, handles) = SystemObserver::attach(&container.bus)?;

        let health = container.bus.broker_health();
        let announced = container
            .bus
            .publish_system(
                "node.started",
                serde_json::json!({
                    "instance_id": container.broker.instance_id().to_string(),
                    "mode": health.mode,
                }),
            )
            .await;
        if let Err(e) = announced {
            warn!(error = %e, "Failed to announce node start");
        }

        info!(
            mode = %health.mode,
            subscriptions = container.bus.subscription_count(),
            "Node is running"
        );

        Ok(Self {
            container,
            observer,
            observer_handles: Mutex::new(handles),
        })
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }

    pub fn feed(&self) -> Arc<FeedService> {
        Arc::clone(&self.container.feed)
    }

    pub fn observer(&self) -> &SystemObserver {
        &self.observer
    }

    /// Stop delivery and release the broker connection.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Unsubscribe node observers
    /// 2. Stop and join every subscription task on the bus
    /// 3. Stop the broker supervisor and drop the distributed link
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        let handles = std::mem::take(&mut *self.observer_handles.lock());
        for handle in &handles {
            self.container.bus.unsubscribe_and_wait(handle).await;
        }

        self.container.bus.shutdown().await;
        self.container.broker.shutdown().await;

        info!(
            alerts_and_events_observed = self.observer.observed(),
            "Shutdown complete"
        );
    }
}
