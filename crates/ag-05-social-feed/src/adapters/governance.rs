use async_trait::async_trait;
use shared_types::MaturityTier;

use crate::ports::{GovernanceError, GovernanceGate};

/// Fixed answer for every request.
///
/// `deny()` is the default wiring: without a governance service, STUDENT
/// agents cannot post.
#[derive(Debug, Clone, Copy)]
pub struct StaticGovernanceGate {
    allow: bool,
}

impl StaticGovernanceGate {
    pub fn allow() -> Self {
        Self { allow: true }
    }

    pub fn deny() -> Self {
        Self { allow: false }
    }
}

impl Default for StaticGovernanceGate {
    fn default() -> Self {
        Self::deny()
    }
}

#[async_trait]
impl GovernanceGate for StaticGovernanceGate {
    async fn may_post(&self, _agent_id: &str, _tier: MaturityTier) -> Result<bool, GovernanceError> {
        Ok(self.allow)
    }
}
