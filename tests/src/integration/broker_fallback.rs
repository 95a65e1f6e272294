//! # Broker Fallback
//!
//! Two nodes share a distributed broker. Losing it degrades each node to
//! local delivery without failing any publish; recovery restores
//! cross-node fan-out.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ag_04_rate_limiter::RateLimitConfig;
    use shared_bus::testing::InMemoryCluster;
    use shared_bus::{BrokerConfig, BrokerMode, HybridBroker, NoOpBusMetrics};
    use shared_types::NewPost;
    use tokio::time::timeout;

    use crate::integration::support::{assert_quiet, collect, next, TestNode};

    fn fast_config() -> BrokerConfig {
        BrokerConfig {
            connect_timeout: Duration::from_millis(200),
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(50),
            ..BrokerConfig::default()
        }
    }

    async fn broker(cluster: &InMemoryCluster) -> Arc<HybridBroker> {
        Arc::new(HybridBroker::start(fast_config(), cluster.connector(), Arc::new(NoOpBusMetrics)).await)
    }

    async fn wait_for_mode(broker: &HybridBroker, mode: BrokerMode) {
        timeout(Duration::from_secs(3), async {
            while broker.mode() != mode {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("broker mode did not change");
    }

    #[tokio::test]
    async fn test_cross_node_delivery_degrade_and_recover() {
        let cluster = InMemoryCluster::new();
        let broker_a = broker(&cluster).await;
        let broker_b = broker(&cluster).await;
        let node_a = TestNode::on_broker(broker_a.clone(), RateLimitConfig::default());
        let node_b = TestNode::on_broker(broker_b.clone(), RateLimitConfig::default());

        let mut on_a = collect(&node_a.bus, "global", None);
        let mut on_b = collect(&node_b.bus, "global", None);

        // Connected: a post on A reaches subscribers on both nodes once.
        let first = node_a
            .feed
            .create_post(NewPost::agent_status("agent-a", "hello cluster"))
            .await
            .unwrap();
        assert_eq!(next(&mut on_a).await.payload.as_post().map(|p| p.id), Some(first.id));
        assert_eq!(next(&mut on_b).await.payload.as_post().map(|p| p.id), Some(first.id));
        assert_quiet(&mut on_a).await;

        // Outage: publishing still succeeds and is delivered locally only.
        cluster.set_online(false);
        wait_for_mode(&broker_a, BrokerMode::LocalOnly).await;
        wait_for_mode(&broker_b, BrokerMode::LocalOnly).await;

        let during = node_a
            .feed
            .create_post(NewPost::agent_status("agent-a", "anyone there?"))
            .await
            .unwrap();
        assert_eq!(next(&mut on_a).await.payload.as_post().map(|p| p.id), Some(during.id));
        assert_quiet(&mut on_b).await;
        assert!(!node_a.feed.bus_health().connected);

        // Recovery: cross-node delivery resumes.
        cluster.set_online(true);
        wait_for_mode(&broker_a, BrokerMode::Distributed).await;
        wait_for_mode(&broker_b, BrokerMode::Distributed).await;

        node_b
            .feed
            .create_post(NewPost::agent_status("agent-b", "back online"))
            .await
            .unwrap();
        assert_eq!(next(&mut on_a).await.sender_id, "agent-b");
        assert_eq!(next(&mut on_b).await.sender_id, "agent-b");
        assert!(node_b.feed.bus_health().reconnect_attempts >= 1);

        broker_a.shutdown().await;
        broker_b.shutdown().await;
    }

    #[tokio::test]
    async fn test_remote_publish_failure_is_invisible_to_posters() {
        let cluster = InMemoryCluster::new();
        let broker = broker(&cluster).await;
        let node = TestNode::on_broker(broker.clone(), RateLimitConfig::default());
        let mut local = collect(&node.bus, "global", None);

        cluster.fail_publishes(true);
        let post = node
            .feed
            .create_post(NewPost::agent_status("agent-1", "still works"))
            .await
            .unwrap();
        assert_eq!(broker.mode(), BrokerMode::LocalOnly);
        assert_eq!(next(&mut local).await.payload.as_post().map(|p| p.id), Some(post.id));
        broker.shutdown().await;
    }
}
