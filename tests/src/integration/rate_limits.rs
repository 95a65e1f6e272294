//! # Maturity Rate Limits
//!
//! Tier quotas enforced through the feed service, and the failure policy
//! when the post count cannot be read.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use ag_01_event_bus::EventBus;
    use ag_02_feed_store::InMemoryFeedStore;
    use ag_04_rate_limiter::{
        FailurePolicy, FeedStoreCounter, InMemoryTierRegistry, MaturityRateLimiter, PostCounter,
        RateLimitConfig, RateLimitError,
    };
    use ag_05_social_feed::{FeedError, FeedService};
    use async_trait::async_trait;
    use shared_bus::LocalBroker;
    use shared_types::{MaturityTier, NewPost, TimeSource, Timestamp, HOUR_MS};

    use crate::integration::support::TestNode;

    /// Store-backed counter that can be switched off.
    struct FlakyCounter {
        inner: FeedStoreCounter,
        down: AtomicBool,
    }

    #[async_trait]
    impl PostCounter for FlakyCounter {
        async fn count_posts_since(&self, agent_id: &str, since: Timestamp) -> Result<u64, RateLimitError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(RateLimitError::CountUnavailable("connection refused".into()));
            }
            self.inner.count_posts_since(agent_id, since).await
        }
    }

    fn service_with_flaky_counter(policy: FailurePolicy) -> (FeedService, Arc<FlakyCounter>) {
        let store = Arc::new(InMemoryFeedStore::new());
        let tiers = Arc::new(InMemoryTierRegistry::with_default(MaturityTier::Intern));
        let counter = Arc::new(FlakyCounter {
            inner: FeedStoreCounter::new(store.clone()),
            down: AtomicBool::new(false),
        });
        let limiter = MaturityRateLimiter::new(
            tiers,
            counter.clone(),
            RateLimitConfig {
                failure_policy: policy,
                ..RateLimitConfig::default()
            },
        );
        let bus = EventBus::new(Arc::new(LocalBroker::new()));
        (FeedService::new(store, bus, Arc::new(limiter)), counter)
    }

    #[tokio::test]
    async fn test_intern_gets_one_post_per_hour() {
        let node = TestNode::local();
        node.tiers.set_tier("intern-7", MaturityTier::Intern);

        node.feed
            .create_post(NewPost::agent_status("intern-7", "hello"))
            .await
            .unwrap();

        node.clock.advance(59 * 60 * 1_000);
        let err = node
            .feed
            .create_post(NewPost::agent_status("intern-7", "again"))
            .await
            .unwrap_err();
        let FeedError::RateLimitExceeded { reason, reset_at } = err else {
            panic!("expected rate limit, got {err:?}");
        };
        assert!(reason.contains("1/1"));
        assert_eq!(reset_at, node.clock.now() + HOUR_MS);

        node.clock.advance(60 * 1_000 + 1);
        assert!(node
            .feed
            .create_post(NewPost::agent_status("intern-7", "next hour"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_supervised_quota_and_status() {
        let node = TestNode::local();
        node.tiers.set_tier("sup", MaturityTier::Supervised);

        for n in 0..12 {
            node.feed
                .create_post(NewPost::agent_status("sup", format!("#{n}")))
                .await
                .unwrap();
        }
        assert!(matches!(
            node.feed.create_post(NewPost::agent_status("sup", "13th")).await,
            Err(FeedError::RateLimitExceeded { .. })
        ));

        let info = node.feed.rate_limit_info("sup").await.unwrap();
        assert_eq!(info.max_per_hour, Some(12));
        assert_eq!(info.remaining, Some(0));
    }

    #[tokio::test]
    async fn test_promotion_lifts_quota() {
        let node = TestNode::local();
        node.tiers.set_tier("rising", MaturityTier::Intern);
        node.feed
            .create_post(NewPost::agent_status("rising", "1"))
            .await
            .unwrap();
        assert!(node
            .feed
            .create_post(NewPost::agent_status("rising", "2"))
            .await
            .is_err());

        assert_eq!(node.tiers.promote("rising"), Some(MaturityTier::Supervised));
        assert!(node
            .feed
            .create_post(NewPost::agent_status("rising", "2"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_fail_open_allows_posts_during_outage() {
        let (feed, counter) = service_with_flaky_counter(FailurePolicy::Open);
        feed.create_post(NewPost::agent_status("intern", "1")).await.unwrap();

        counter.down.store(true, Ordering::SeqCst);
        // Over quota, but the count cannot be read.
        assert!(feed.create_post(NewPost::agent_status("intern", "2")).await.is_ok());
        assert!(feed.create_post(NewPost::agent_status("intern", "3")).await.is_ok());

        counter.down.store(false, Ordering::SeqCst);
        assert!(feed.create_post(NewPost::agent_status("intern", "4")).await.is_err());
    }

    #[tokio::test]
    async fn test_fail_closed_denies_during_outage() {
        let (feed, counter) = service_with_flaky_counter(FailurePolicy::Closed);
        counter.down.store(true, Ordering::SeqCst);

        let err = feed
            .create_post(NewPost::agent_status("intern", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::RateLimitExceeded { .. }));
        assert!(matches!(
            feed.rate_limit_info("intern").await,
            Err(FeedError::RateLimitStatus(RateLimitError::CountUnavailable(_)))
        ));
    }
}
