//! Fixtures shared by the integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use ag_01_event_bus::{handler_fn, EventBus, HandlerError};
use ag_02_feed_store::InMemoryFeedStore;
use ag_04_rate_limiter::{FeedStoreCounter, InMemoryTierRegistry, MaturityRateLimiter, RateLimitConfig};
use ag_05_social_feed::FeedService;
use shared_bus::{BusMessage, LocalBroker, MessageBroker};
use shared_types::{ManualTimeSource, MaturityTier, HOUR_MS};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// One service instance with a controllable clock.
pub struct TestNode {
    pub feed: FeedService,
    pub bus: EventBus,
    pub store: Arc<InMemoryFeedStore>,
    pub tiers: Arc<InMemoryTierRegistry>,
    pub clock: Arc<ManualTimeSource>,
}

impl TestNode {
    /// Node on a private in-process broker; unknown agents are AUTONOMOUS.
    pub fn local() -> Self {
        Self::on_broker(Arc::new(LocalBroker::new()), RateLimitConfig::default())
    }

    pub fn with_rate_limits(config: RateLimitConfig) -> Self {
        Self::on_broker(Arc::new(LocalBroker::new()), config)
    }

    pub fn on_broker(broker: Arc<dyn MessageBroker>, rate_limits: RateLimitConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(10 * HOUR_MS));
        let store = Arc::new(InMemoryFeedStore::with_time_source(clock.clone()));
        let tiers = Arc::new(InMemoryTierRegistry::with_default(MaturityTier::Autonomous));
        let limiter = MaturityRateLimiter::new(
            tiers.clone(),
            Arc::new(FeedStoreCounter::new(store.clone())),
            rate_limits,
        )
        .with_time_source(clock.clone());
        let bus = EventBus::with_time_source(broker, clock.clone());
        let feed = FeedService::new(store.clone(), bus.clone(), Arc::new(limiter));

        Self {
            feed,
            bus,
            store,
            tiers,
            clock,
        }
    }
}

/// Subscribe and forward every delivered message into a queue.
pub fn collect(
    bus: &EventBus,
    topic: &str,
    channel_filter: Option<&str>,
) -> mpsc::UnboundedReceiver<Arc<BusMessage>> {
    let (tx, rx) = mpsc::unbounded_channel();
    bus.subscribe(
        topic,
        channel_filter.map(str::to_string),
        handler_fn(move |message| {
            let tx = tx.clone();
            async move { tx.send(message).map_err(|_| HandlerError::Disconnected) }
        }),
    )
    .expect("subscribe");
    rx
}

pub async fn next(rx: &mut mpsc::UnboundedReceiver<Arc<BusMessage>>) -> Arc<BusMessage> {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("subscription closed")
}

/// Assert nothing arrives within a short grace period.
pub async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<Arc<BusMessage>>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "unexpected message delivered");
}
