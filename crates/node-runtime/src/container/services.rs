//! Holds every service instance for the lifetime of the node.

use std::sync::Arc;

use ag_01_event_bus::EventBus;
use ag_02_feed_store::InMemoryFeedStore;
use ag_04_rate_limiter::{FeedStoreCounter, InMemoryTierRegistry, MaturityRateLimiter};
use ag_05_social_feed::{BusInteractionNotifier, FeedService, StaticGovernanceGate};
use agora_telemetry::{PrometheusBusMetrics, PrometheusFeedMetrics, PrometheusRateLimitMetrics};
use shared_bus::HybridBroker;
use tracing::info;

use crate::container::config::NodeConfig;

pub struct ServiceContainer {
    pub config: NodeConfig,

    /// Distributed broker with local fallback.
    pub broker: Arc<HybridBroker>,

    pub bus: EventBus,

    pub store: Arc<InMemoryFeedStore>,

    /// Agent maturity tiers. Populated by the maturity service.
    pub tiers: Arc<InMemoryTierRegistry>,

    pub limiter: Arc<MaturityRateLimiter>,

    pub feed: Arc<FeedService>,
}

impl ServiceContainer {
    /// Connect the broker per `config.broker`, then build the services on top.
    pub async fn new(config: NodeConfig) -> Self {
        let broker =
            HybridBroker::from_config(config.broker.clone(), Arc::new(PrometheusBusMetrics)).await;
        Self::with_broker(config, Arc::new(broker))
    }

    /// Build the services on an already constructed broker.
    pub fn with_broker(config: NodeConfig, broker: Arc<HybridBroker>) -> Self {
        let bus = EventBus::new(broker.clone());
        let store = Arc::new(InMemoryFeedStore::new());
        let tiers = Arc::new(InMemoryTierRegistry::with_default(
            config.governance.default_tier,
        ));

        let limiter = Arc::new(
            MaturityRateLimiter::new(
                tiers.clone(),
                Arc::new(FeedStoreCounter::new(store.clone())),
                config.rate_limit.clone(),
            )
            .with_metrics(Arc::new(PrometheusRateLimitMetrics)),
        );

        let governance = if config.governance.allow_student_posts {
            StaticGovernanceGate::allow()
        } else {
            StaticGovernanceGate::deny()
        };

        let feed = Arc::new(
            FeedService::new(store.clone(), bus.clone(), limiter.clone())
                .with_governance(Arc::new(governance))
                .with_notifier(Arc::new(BusInteractionNotifier::new(bus.clone())))
                .with_metrics(Arc::new(PrometheusFeedMetrics))
                .with_config(config.feed.clone())
                .with_pagination(config.pagination.clone()),
        );

        info!(
            broker_mode = %broker.mode(),
            instance_id = %broker.instance_id(),
            failure_policy = %config.rate_limit.failure_policy,
            "Services initialized"
        );

        Self {
            config,
            broker,
            bus,
            store,
            tiers,
            limiter,
            feed,
        }
    }
}
