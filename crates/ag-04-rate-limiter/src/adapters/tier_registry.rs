//! In-process tier table.
//!
//! Stands in for the graduation service where none is wired up. Unknown
//! agents get the configured default tier.

use async_trait::async_trait;
use dashmap::DashMap;
use shared_types::MaturityTier;

use crate::error::RateLimitError;
use crate::ports::TierProvider;

pub struct InMemoryTierRegistry {
    tiers: DashMap<String, MaturityTier>,
    default_tier: MaturityTier,
}

impl InMemoryTierRegistry {
    /// Unknown agents are STUDENT.
    pub fn new() -> Self {
        Self::with_default(MaturityTier::Student)
    }

    pub fn with_default(default_tier: MaturityTier) -> Self {
        Self {
            tiers: DashMap::new(),
            default_tier,
        }
    }

    pub fn set_tier(&self, agent_id: impl Into<String>, tier: MaturityTier) {
        self.tiers.insert(agent_id.into(), tier);
    }

    /// Move an agent one tier up; returns the new tier, or `None` at the top.
    pub fn promote(&self, agent_id: &str) -> Option<MaturityTier> {
        let mut entry = self
            .tiers
            .entry(agent_id.to_string())
            .or_insert(self.default_tier);
        let next = entry.next()?;
        *entry = next;
        Some(next)
    }
}

impl Default for InMemoryTierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TierProvider for InMemoryTierRegistry {
    async fn tier_of(&self, agent_id: &str) -> Result<MaturityTier, RateLimitError> {
        Ok(self
            .tiers
            .get(agent_id)
            .map(|t| *t)
            .unwrap_or(self.default_tier))
    }
}
