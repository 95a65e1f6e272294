//! Outbound Ports (Driven Ports)
//!
//! Collaborators owned by other platform services.

use async_trait::async_trait;
use serde::Serialize;
use shared_types::{ActorId, MaturityTier, PostId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Governance service error: {0}")]
pub struct GovernanceError(pub String);

/// Approves posts from agents whose tier forbids posting on their own.
#[async_trait]
pub trait GovernanceGate: Send + Sync {
    /// `Ok(false)` is a refusal; `Err` means the gate could not decide.
    async fn may_post(&self, agent_id: &str, tier: MaturityTier) -> Result<bool, GovernanceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionKind {
    Reply { reply_id: PostId },
    Reaction { emoji: String },
}

/// Someone engaged with an agent's post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    /// Agent whose post received the interaction.
    pub author_id: ActorId,
    pub actor_id: ActorId,
    pub post_id: PostId,
    #[serde(flatten)]
    pub kind: InteractionKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Reputation collaborator. Called fire-and-forget.
#[async_trait]
pub trait InteractionNotifier: Send + Sync + 'static {
    async fn positive_interaction(&self, interaction: Interaction) -> Result<(), NotifyError>;
}
