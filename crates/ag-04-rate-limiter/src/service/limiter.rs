//! # Maturity Rate Limiter
//!
//! Stateless: every check reads the tier and counts recent posts afresh, so
//! the limiter holds no lock of its own and is safe to share.
//!
//! Two concurrent checks for the same agent may both pass before either
//! post lands. The quota is a throughput bound, not a hard cap.

use shared_types::{MaturityTier, SystemTimeSource, TimeSource, Timestamp};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{Denial, FailurePolicy, RateLimitConfig, RateLimitDecision, RateLimitInfo, TierLimit};
use crate::error::RateLimitError;
use crate::metrics::{NoOpRateLimitMetrics, RateLimitMetrics};
use crate::ports::{PostCounter, TierProvider};

pub struct MaturityRateLimiter {
    tiers: Arc<dyn TierProvider>,
    counter: Arc<dyn PostCounter>,
    config: RateLimitConfig,
    time: Arc<dyn TimeSource>,
    metrics: Arc<dyn RateLimitMetrics>,
}

impl MaturityRateLimiter {
    pub fn new(
        tiers: Arc<dyn TierProvider>,
        counter: Arc<dyn PostCounter>,
        config: RateLimitConfig,
    ) -> Self {
        Self {
            tiers,
            counter,
            config,
            time: Arc::new(SystemTimeSource),
            metrics: Arc::new(NoOpRateLimitMetrics),
        }
    }

    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn RateLimitMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decide whether `agent_id` may post now.
    ///
    /// Never fails. A count failure is resolved by the failure policy; a
    /// tier lookup failure always denies with [`Denial::TierUnavailable`].
    pub async fn check(&self, agent_id: &str) -> RateLimitDecision {
        let now = self.time.now();
        let reset_at = now.saturating_add(self.config.window_ms);

        let tier = match self.tiers.tier_of(agent_id).await {
            Ok(tier) => tier,
            Err(e) => {
                warn!(agent_id, error = %e, "Tier lookup failed, denying post");
                self.metrics.denied(Denial::TierUnavailable.label());
                return RateLimitDecision::deny(
                    Denial::TierUnavailable,
                    format!("Maturity tier unavailable: {e}"),
                    None,
                    reset_at,
                )
                .degraded();
            }
        };

        let decision = match self.config.limit_for(tier) {
            TierLimit::Unlimited => RateLimitDecision::allow(Some(tier), reset_at),
            TierLimit::Forbidden => RateLimitDecision::deny(
                Denial::TierForbidden,
                format!("Posting is not permitted at the {tier} maturity tier"),
                Some(tier),
                reset_at,
            ),
            TierLimit::PerWindow(limit) => {
                let since = self.window_start(now);
                let used = match self.counter.count_posts_since(agent_id, since).await {
                    Ok(used) => used,
                    Err(e) => return self.on_failure(agent_id, tier, e, reset_at),
                };
                if used >= limit {
                    RateLimitDecision::deny(
                        Denial::QuotaExhausted { used, limit },
                        format!(
                            "Rate limit reached: {used}/{limit} posts in the current window for the {tier} tier; retry after {reset_at}"
                        ),
                        Some(tier),
                        reset_at,
                    )
                } else {
                    RateLimitDecision::allow(Some(tier), reset_at)
                }
            }
        };

        match &decision.denial {
            None => self.metrics.allowed(tier),
            Some(denial) => {
                debug!(agent_id, tier = %tier, denial = denial.label(), "Post rate limited");
                self.metrics.denied(denial.label());
            }
        }
        decision
    }

    /// Quota status for `agent_id`.
    ///
    /// Unlike [`Self::check`], dependency failures are returned to the caller.
    pub async fn info(&self, agent_id: &str) -> Result<RateLimitInfo, RateLimitError> {
        let now = self.time.now();
        let tier = self.tiers.tier_of(agent_id).await?;
        let limit = self.config.limit_for(tier);

        let used_in_window = match limit {
            TierLimit::Unlimited => 0,
            TierLimit::Forbidden | TierLimit::PerWindow(_) => {
                self.counter
                    .count_posts_since(agent_id, self.window_start(now))
                    .await?
            }
        };
        let max_per_hour = limit.max();

        Ok(RateLimitInfo {
            tier,
            max_per_hour,
            used_in_window,
            remaining: max_per_hour.map(|max| max.saturating_sub(used_in_window)),
            reset_at: now.saturating_add(self.config.window_ms),
        })
    }

    fn window_start(&self, now: Timestamp) -> Timestamp {
        now.saturating_sub(self.config.window_ms)
    }

    fn on_failure(
        &self,
        agent_id: &str,
        tier: MaturityTier,
        error: RateLimitError,
        reset_at: Timestamp,
    ) -> RateLimitDecision {
        match self.config.failure_policy {
            FailurePolicy::Open => {
                warn!(agent_id, error = %error, "Rate limit check failed, allowing post (fail-open)");
                self.metrics.failed_open();
                RateLimitDecision::allow(Some(tier), reset_at).degraded()
            }
            FailurePolicy::Closed => {
                warn!(agent_id, error = %error, "Rate limit check failed, denying post (fail-closed)");
                self.metrics.denied(Denial::Unavailable.label());
                RateLimitDecision::deny(
                    Denial::Unavailable,
                    "Posting is temporarily unavailable, please retry shortly".to_string(),
                    Some(tier),
                    reset_at,
                )
                .degraded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FeedStoreCounter, InMemoryTierRegistry};
    use ag_02_feed_store::{FeedStore, InMemoryFeedStore};
    use async_trait::async_trait;
    use shared_types::{ManualTimeSource, NewPost, HOUR_MS};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Fixture {
        limiter: MaturityRateLimiter,
        store: Arc<InMemoryFeedStore>,
        tiers: Arc<InMemoryTierRegistry>,
        clock: Arc<ManualTimeSource>,
    }

    fn fixture(config: RateLimitConfig) -> Fixture {
        let clock = Arc::new(ManualTimeSource::new(10 * HOUR_MS));
        let store = Arc::new(InMemoryFeedStore::with_time_source(clock.clone()));
        let tiers = Arc::new(InMemoryTierRegistry::new());
        let limiter = MaturityRateLimiter::new(
            tiers.clone(),
            Arc::new(FeedStoreCounter::new(store.clone())),
            config,
        )
        .with_time_source(clock.clone());
        Fixture {
            limiter,
            store,
            tiers,
            clock,
        }
    }

    async fn post(f: &Fixture, agent: &str) {
        f.store.insert_post(NewPost::agent_status(agent, "x")).await.unwrap();
    }

    #[derive(Default)]
    struct CountingCounter {
        calls: AtomicU64,
    }

    #[async_trait]
    impl PostCounter for CountingCounter {
        async fn count_posts_since(&self, _: &str, _: Timestamp) -> Result<u64, RateLimitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    struct FailingTiers;

    #[async_trait]
    impl TierProvider for FailingTiers {
        async fn tier_of(&self, _: &str) -> Result<MaturityTier, RateLimitError> {
            Err(RateLimitError::TierUnavailable("graduation service down".into()))
        }
    }

    #[tokio::test]
    async fn test_intern_second_post_denied() {
        let f = fixture(RateLimitConfig::default());
        f.tiers.set_tier("intern", MaturityTier::Intern);

        assert!(f.limiter.check("intern").await.allowed);
        post(&f, "intern").await;

        let decision = f.limiter.check("intern").await;
        assert!(!decision.allowed);
        assert_eq!(decision.denial, Some(Denial::QuotaExhausted { used: 1, limit: 1 }));
        assert_eq!(decision.reset_at, 11 * HOUR_MS);
        assert!(decision.reason.unwrap().contains("Rate limit"));
    }

    #[tokio::test]
    async fn test_window_rolls() {
        let f = fixture(RateLimitConfig::default());
        f.tiers.set_tier("intern", MaturityTier::Intern);
        post(&f, "intern").await;
        assert!(!f.limiter.check("intern").await.allowed);

        f.clock.advance(HOUR_MS - 1);
        assert!(!f.limiter.check("intern").await.allowed);

        f.clock.advance(2);
        assert!(f.limiter.check("intern").await.allowed);
    }

    #[tokio::test]
    async fn test_supervised_quota() {
        let f = fixture(RateLimitConfig::default());
        f.tiers.set_tier("sup", MaturityTier::Supervised);
        for _ in 0..11 {
            post(&f, "sup").await;
        }
        assert!(f.limiter.check("sup").await.allowed);
        post(&f, "sup").await;
        assert!(!f.limiter.check("sup").await.allowed);

        // Other agents' posts don't count.
        f.tiers.set_tier("other", MaturityTier::Supervised);
        assert!(f.limiter.check("other").await.allowed);
    }

    #[tokio::test]
    async fn test_student_denied_without_counting() {
        let counter = Arc::new(CountingCounter::default());
        let limiter = MaturityRateLimiter::new(
            Arc::new(InMemoryTierRegistry::new()),
            counter.clone(),
            RateLimitConfig::default(),
        );

        let decision = limiter.check("newbie").await;
        assert!(!decision.allowed);
        assert_eq!(decision.denial, Some(Denial::TierForbidden));
        assert_eq!(decision.tier, Some(MaturityTier::Student));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_autonomous_skips_count() {
        let counter = Arc::new(CountingCounter::default());
        let limiter = MaturityRateLimiter::new(
            Arc::new(InMemoryTierRegistry::with_default(MaturityTier::Autonomous)),
            counter.clone(),
            RateLimitConfig::default(),
        );

        for _ in 0..50 {
            assert!(limiter.check("auto").await.allowed);
        }
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);

        let info = limiter.info("auto").await.unwrap();
        assert_eq!(info.max_per_hour, None);
        assert_eq!(info.remaining, None);
    }

    #[tokio::test]
    async fn test_count_failure_fails_open() {
        let f = fixture(RateLimitConfig::default());
        f.tiers.set_tier("intern", MaturityTier::Intern);
        post(&f, "intern").await;
        f.store.set_available(false);

        let decision = f.limiter.check("intern").await;
        assert!(decision.allowed);
        assert!(decision.degraded);
        assert_eq!(decision.tier, Some(MaturityTier::Intern));
    }

    #[tokio::test]
    async fn test_count_failure_fails_closed_when_configured() {
        let f = fixture(RateLimitConfig {
            failure_policy: FailurePolicy::Closed,
            ..RateLimitConfig::default()
        });
        f.tiers.set_tier("intern", MaturityTier::Intern);
        f.store.set_available(false);

        let decision = f.limiter.check("intern").await;
        assert!(!decision.allowed);
        assert_eq!(decision.denial, Some(Denial::Unavailable));
        assert!(decision.reason.unwrap().contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_tier_failure_denies_under_either_policy() {
        for failure_policy in [FailurePolicy::Open, FailurePolicy::Closed] {
            let counter = Arc::new(CountingCounter::default());
            let limiter = MaturityRateLimiter::new(
                Arc::new(FailingTiers),
                counter.clone(),
                RateLimitConfig {
                    failure_policy,
                    ..RateLimitConfig::default()
                },
            );

            let decision = limiter.check("x").await;
            assert!(!decision.allowed);
            assert!(decision.degraded);
            assert_eq!(decision.denial, Some(Denial::TierUnavailable));
            assert_eq!(decision.tier, None);
            assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
            assert!(limiter.info("x").await.is_err());
        }
    }

    #[tokio::test]
    async fn test_info() {
        let f = fixture(RateLimitConfig::default());
        f.tiers.set_tier("sup", MaturityTier::Supervised);
        for _ in 0..3 {
            post(&f, "sup").await;
        }

        let info = f.limiter.info("sup").await.unwrap();
        assert_eq!(info.tier, MaturityTier::Supervised);
        assert_eq!(info.max_per_hour, Some(12));
        assert_eq!(info.used_in_window, 3);
        assert_eq!(info.remaining, Some(9));
        assert_eq!(info.reset_at, f.clock.now() + HOUR_MS);

        let student = f.limiter.info("newbie").await.unwrap();
        assert_eq!(student.remaining, Some(0));
    }
}
