//! Conversation-scoped session state
//!
//! One conversation gets at most one gateway and one deployed agent. The
//! trackers live in an explicitly constructed `SessionState` owned by the
//! host and shared with the services; a multi-tenant host must build one
//! per conversation rather than sharing a process-wide instance.

use std::sync::Arc;
use tokio::sync::RwLock;

/// One-shot gateway creation tracker
#[derive(Debug, Clone, Default)]
pub struct GatewaySession {
    pub created: bool,
    pub gateway_id: Option<String>,
    pub gateway_name: Option<String>,
}

impl GatewaySession {
    pub fn mark_created(&mut self, gateway_id: impl Into<String>, gateway_name: impl Into<String>) {
        self.created = true;
        self.gateway_id = Some(gateway_id.into());
        self.gateway_name = Some(gateway_name.into());
    }
}

/// One-shot agent deployment tracker
#[derive(Debug, Clone, Default)]
pub struct DeploymentSession {
    pub deployed: bool,
    pub agent_name: Option<String>,
}

impl DeploymentSession {
    pub fn mark_deployed(&mut self, agent_name: impl Into<String>) {
        self.deployed = true;
        self.agent_name = Some(agent_name.into());
    }
}

/// Combined per-conversation state
#[derive(Debug, Default)]
pub struct SessionState {
    pub gateway: GatewaySession,
    pub deployment: DeploymentSession,
}

impl SessionState {
    /// Reset at the start of every top-level conversation.
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

/// Shared handle services hold onto
pub type SharedSession = Arc<RwLock<SessionState>>;

pub fn new_shared_session() -> SharedSession {
    Arc::new(RwLock::new(SessionState::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_both_trackers() {
        let mut state = SessionState::default();
        state.gateway.mark_created("gw-1", "Orders");
        state.deployment.mark_deployed("CalcBot");
        assert!(state.gateway.created);
        assert!(state.deployment.deployed);

        state.reset();
        assert!(!state.gateway.created);
        assert!(state.gateway.gateway_id.is_none());
        assert!(!state.deployment.deployed);
        assert!(state.deployment.agent_name.is_none());
    }
}
