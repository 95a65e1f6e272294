//! # Node Lifecycle
//!
//! Fully wired nodes sharing a distributed broker: governance applies to
//! unknown agents, alerts cross nodes, and shutdown releases every
//! subscription.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ag_05_social_feed::FeedError;
    use node_runtime::{NodeConfig, NodeRuntime, ServiceContainer};
    use shared_bus::testing::InMemoryCluster;
    use shared_bus::{BrokerConfig, BrokerMode, HybridBroker, NoOpBusMetrics};
    use shared_types::{MaturityTier, NewPost, PostType};

    use crate::integration::support::{collect, next};

    async fn node(cluster: &InMemoryCluster, config: NodeConfig) -> NodeRuntime {
        let broker_config = BrokerConfig {
            connect_timeout: Duration::from_millis(200),
            ..BrokerConfig::default()
        };
        let broker = HybridBroker::start(broker_config, cluster.connector(), Arc::new(NoOpBusMetrics)).await;
        let container = ServiceContainer::with_broker(config, Arc::new(broker));
        NodeRuntime::from_container(Arc::new(container)).await.unwrap()
    }

    #[tokio::test]
    async fn test_alert_crosses_nodes_and_shutdown_releases_subscriptions() {
        let cluster = InMemoryCluster::new();
        let node_a = node(&cluster, NodeConfig::default()).await;
        let node_b = node(&cluster, NodeConfig::default()).await;
        assert_eq!(node_a.container().broker.mode(), BrokerMode::Distributed);

        let mut alerts_on_b = collect(&node_b.container().bus, "alerts", None);

        node_a.container().tiers.set_tier("monitor", MaturityTier::Autonomous);
        let alert = node_a
            .feed()
            .create_post(NewPost::agent_status("monitor", "disk full").with_type(PostType::Alert))
            .await
            .unwrap();

        let received = next(&mut alerts_on_b).await;
        assert_eq!(received.payload.as_post().map(|p| p.id), Some(alert.id));
        // Stores are per node; only the bus is shared.
        assert!(node_b.container().store.is_empty());

        node_a.shutdown().await;
        node_b.shutdown().await;
        assert_eq!(node_a.container().bus.subscription_count(), 0);
        assert_eq!(node_b.container().bus.subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_agents_start_as_students() {
        let cluster = InMemoryCluster::new();
        let runtime = node(&cluster, NodeConfig::default()).await;

        let err = runtime
            .feed()
            .create_post(NewPost::agent_status("fresh-agent", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::GovernanceDenied { .. }));
        assert!(runtime.container().store.is_empty());

        runtime.shutdown().await;
    }
}
