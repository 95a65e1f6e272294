//! # Feed Service
//!
//! Orchestrates a write:
//!
//! ```text
//! validate ─► rate limiter ─► (STUDENT) governance gate ─► store ─► bus
//!                                                            └─► reputation (spawned)
//! ```
//!
//! and a read: filters + cursor ─► pagination engine ─► store.
//!
//! Once a post is stored the write succeeds. A failed bus publish or
//! notification is logged, never turned into an error.

use ag_01_event_bus::EventBus;
use ag_02_feed_store::{FeedFilters, FeedOrder, FeedStore};
use ag_03_feed_pagination::{FeedPage, PaginationConfig, PaginationEngine};
use ag_04_rate_limiter::{Denial, MaturityRateLimiter, RateLimitInfo};
use shared_bus::{BrokerHealth, PostEventKind};
use shared_types::{MaturityTier, NewPost, Post, PostId, SenderType};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{NoOpNotifier, StaticGovernanceGate};
use crate::domain::{validate_draft, validate_reaction, FeedQuery, FeedServiceConfig};
use crate::error::FeedError;
use crate::metrics::{FeedMetrics, NoOpFeedMetrics};
use crate::ports::{GovernanceGate, Interaction, InteractionKind, InteractionNotifier};

pub struct FeedService {
    store: Arc<dyn FeedStore>,
    pagination: PaginationEngine,
    limiter: Arc<MaturityRateLimiter>,
    bus: EventBus,
    governance: Arc<dyn GovernanceGate>,
    notifier: Arc<dyn InteractionNotifier>,
    metrics: Arc<dyn FeedMetrics>,
    config: FeedServiceConfig,
}

impl FeedService {
    /// Service with STUDENT posting denied and notifications dropped.
    pub fn new(store: Arc<dyn FeedStore>, bus: EventBus, limiter: Arc<MaturityRateLimiter>) -> Self {
        Self {
            pagination: PaginationEngine::new(Arc::clone(&store)),
            store,
            limiter,
            bus,
            governance: Arc::new(StaticGovernanceGate::deny()),
            notifier: Arc::new(NoOpNotifier),
            metrics: Arc::new(NoOpFeedMetrics),
            config: FeedServiceConfig::default(),
        }
    }

    pub fn with_governance(mut self, governance: Arc<dyn GovernanceGate>) -> Self {
        self.governance = governance;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn InteractionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FeedMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_config(mut self, config: FeedServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_pagination(mut self, config: PaginationConfig) -> Self {
        self.pagination = PaginationEngine::with_config(Arc::clone(&self.store), config);
        self
    }

    /// Publish a post, or a reply when `draft.reply_to_id` is set.
    ///
    /// # Errors
    /// - `Validation` for empty or oversized content
    /// - `RateLimitExceeded` when the agent's quota is used up
    /// - `GovernanceDenied` when a STUDENT agent is refused by governance
    /// - `NotFound` when replying to a missing post
    pub async fn create_post(&self, draft: NewPost) -> Result<Post, FeedError> {
        validate_draft(&draft, &self.config)?;

        if draft.sender_type == SenderType::Agent {
            self.authorize_agent(&draft.sender_id).await?;
        }

        let post = self.store.insert_post(draft).await?;
        self.metrics.post_created(post.post_type, post.is_reply());
        info!(
            post_id = post.id,
            sender_id = %post.sender_id,
            post_type = %post.post_type,
            channel = ?post.channel_id,
            "Post created"
        );

        let kind = match post.reply_to_id {
            Some(parent_id) => {
                self.notify_reply(parent_id, &post).await;
                PostEventKind::Replied
            }
            None => PostEventKind::Created,
        };
        self.broadcast(kind, &post).await;

        Ok(post)
    }

    /// Reply to `parent_id`.
    pub async fn reply(&self, parent_id: PostId, draft: NewPost) -> Result<Post, FeedError> {
        self.create_post(draft.replying_to(parent_id)).await
    }

    /// Add one `emoji` reaction from `actor_id`.
    pub async fn react(&self, post_id: PostId, actor_id: &str, emoji: &str) -> Result<Post, FeedError> {
        validate_reaction(emoji)?;
        let post = self.store.add_reaction(post_id, emoji.trim()).await?;
        self.metrics.reaction_added();
        debug!(post_id, actor_id, emoji, "Reaction added");

        if post.sender_type == SenderType::Agent && post.sender_id != actor_id {
            self.notify(Interaction {
                author_id: post.sender_id.clone(),
                actor_id: actor_id.to_string(),
                post_id,
                kind: InteractionKind::Reaction {
                    emoji: emoji.trim().to_string(),
                },
            });
        }
        self.broadcast(PostEventKind::Reacted, &post).await;
        Ok(post)
    }

    pub async fn get_post(&self, post_id: PostId) -> Result<Post, FeedError> {
        self.store
            .get_post(post_id)
            .await?
            .ok_or(FeedError::NotFound(post_id))
    }

    /// Read a feed page.
    ///
    /// An unusable cursor restarts from the first page; the returned page
    /// then has `restarted = true`.
    pub async fn get_feed(&self, query: &FeedQuery) -> Result<FeedPage, FeedError> {
        Ok(self
            .pagination
            .get_page_or_restart(
                query.cursor.as_deref(),
                &query.filters,
                query.order,
                query.page_size,
            )
            .await?)
    }

    /// Like [`Self::get_feed`], but an unusable cursor is an error.
    pub async fn get_feed_strict(&self, query: &FeedQuery) -> Result<FeedPage, FeedError> {
        Ok(self
            .pagination
            .get_page(
                query.cursor.as_deref(),
                &query.filters,
                query.order,
                query.page_size,
            )
            .await?)
    }

    /// Direct replies to `parent_id`, newest first.
    pub async fn get_replies(
        &self,
        parent_id: PostId,
        cursor: Option<String>,
        page_size: Option<usize>,
    ) -> Result<FeedPage, FeedError> {
        if self.store.get_post(parent_id).await?.is_none() {
            return Err(FeedError::NotFound(parent_id));
        }
        let query = FeedQuery {
            cursor,
            filters: FeedFilters::new().replies_to(parent_id),
            order: FeedOrder::Chronological,
            page_size,
        };
        self.get_feed(&query).await
    }

    /// Send a message to one agent's directed topic.
    pub async fn send_direct(
        &self,
        sender_id: &str,
        recipient_id: &str,
        body: serde_json::Value,
    ) -> Result<usize, FeedError> {
        let delivered = self.bus.publish_directed(sender_id, recipient_id, body).await?;
        debug!(sender_id, recipient_id, delivered, "Direct message sent");
        Ok(delivered)
    }

    pub async fn rate_limit_info(&self, agent_id: &str) -> Result<RateLimitInfo, FeedError> {
        Ok(self.limiter.info(agent_id).await?)
    }

    pub fn bus_health(&self) -> BrokerHealth {
        self.bus.broker_health()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    async fn authorize_agent(&self, agent_id: &str) -> Result<(), FeedError> {
        let decision = self.limiter.check(agent_id).await;
        if decision.allowed {
            return Ok(());
        }

        match decision.denial {
            Some(Denial::TierForbidden) => {
                let tier = decision.tier.unwrap_or(MaturityTier::Student);
                let approved = self
                    .governance
                    .may_post(agent_id, tier)
                    .await
                    .map_err(|e| FeedError::GovernanceUnavailable(e.to_string()))?;
                if approved {
                    debug!(agent_id, tier = %tier, "Post approved by governance");
                    return Ok(());
                }
                self.metrics.governance_denied();
                Err(FeedError::GovernanceDenied {
                    reason: decision
                        .reason
                        .unwrap_or_else(|| format!("{tier} agents may not post")),
                })
            }
            // An unknown tier may be STUDENT, so the gate cannot be skipped.
            Some(Denial::TierUnavailable) => Err(FeedError::GovernanceUnavailable(
                decision
                    .reason
                    .unwrap_or_else(|| "maturity tier unavailable".into()),
            )),
            _ => {
                self.metrics.rate_limited();
                Err(FeedError::RateLimitExceeded {
                    reason: decision.reason.unwrap_or_else(|| "rate limit exceeded".into()),
                    reset_at: decision.reset_at,
                })
            }
        }
    }

    async fn broadcast(&self, kind: PostEventKind, post: &Post) {
        if let Err(e) = self.bus.publish_post_event(kind, post).await {
            warn!(post_id = post.id, kind = ?kind, error = %e, "Failed to broadcast post event");
        }
    }

    async fn notify_reply(&self, parent_id: PostId, reply: &Post) {
        let parent = match self.store.get_post(parent_id).await {
            Ok(Some(parent)) => parent,
            Ok(None) => return,
            Err(e) => {
                warn!(parent_id, error = %e, "Could not load parent for reputation notification");
                return;
            }
        };
        if parent.sender_type == SenderType::Agent && parent.sender_id != reply.sender_id {
            self.notify(Interaction {
                author_id: parent.sender_id,
                actor_id: reply.sender_id.clone(),
                post_id: parent_id,
                kind: InteractionKind::Reply { reply_id: reply.id },
            });
        }
    }

    /// Fire-and-forget on a spawned task, bounded by `notify_timeout`.
    fn notify(&self, interaction: Interaction) {
        let notifier = Arc::clone(&self.notifier);
        let metrics = Arc::clone(&self.metrics);
        let budget = self.config.notify_timeout;

        tokio::spawn(async move {
            let author = interaction.author_id.clone();
            match tokio::time::timeout(budget, notifier.positive_interaction(interaction)).await {
                Ok(Ok(())) => debug!(author_id = %author, "Reputation notified"),
                Ok(Err(e)) => {
                    metrics.notification_failed();
                    warn!(author_id = %author, error = %e, "Reputation notification failed");
                }
                Err(_) => {
                    metrics.notification_failed();
                    warn!(author_id = %author, timeout_ms = budget.as_millis() as u64, "Reputation notification timed out");
                }
            }
        });
    }
}
