//! Agent domain types

use serde::{Deserialize, Serialize};

use super::error::{FactoryError, FactoryResult};
use super::validate::validate_a2a_url;

/// Registry view of a deployed agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Runtime instance id
    pub agent_id: String,
    /// Human-readable agent name
    pub agent_name: String,
    /// Fully qualified resource name
    pub agent_arn: String,
    /// Lifecycle status as reported by the control plane
    pub status: String,
    /// A2A endpoint, present only for agents that serve the protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a2a_url: Option<String>,
    /// Declared capabilities
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Derived deployment mode for an agent.
///
/// Server agents host tools behind a gateway and expose an A2A endpoint;
/// client agents delegate to other agents they know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Server,
    Client,
}

impl AgentMode {
    /// Derive the mode from the deployment request. A gateway takes
    /// precedence over known agents; with neither, server is the default.
    pub fn derive(gateway_id: Option<&str>, known_agent_ids: &[String]) -> Self {
        if gateway_id.is_some_and(|id| !id.trim().is_empty()) {
            AgentMode::Server
        } else if !known_agent_ids.is_empty() {
            AgentMode::Client
        } else {
            AgentMode::Server
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentMode::Server => write!(f, "server"),
            AgentMode::Client => write!(f, "client"),
        }
    }
}

/// A validated outbound A2A link from a source agent to a target agent.
///
/// Construction is the validation gate: an `A2AConnection` that exists is
/// known to have non-empty fields and an HTTPS target endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2AConnection {
    pub source_agent_id: String,
    pub target_agent_id: String,
    pub target_a2a_url: String,
    pub target_agent_name: String,
}

impl A2AConnection {
    pub fn new(
        source_agent_id: impl Into<String>,
        target_agent_id: impl Into<String>,
        target_a2a_url: impl Into<String>,
        target_agent_name: impl Into<String>,
    ) -> FactoryResult<Self> {
        let connection = Self {
            source_agent_id: source_agent_id.into(),
            target_agent_id: target_agent_id.into(),
            target_a2a_url: target_a2a_url.into(),
            target_agent_name: target_agent_name.into(),
        };
        if connection.source_agent_id.trim().is_empty() {
            return Err(FactoryError::Validation(
                "source_agent_id cannot be empty".into(),
            ));
        }
        if connection.target_agent_id.trim().is_empty() {
            return Err(FactoryError::Validation(
                "target_agent_id cannot be empty".into(),
            ));
        }
        validate_a2a_url(&connection.target_a2a_url)?;
        if connection.target_agent_name.trim().is_empty() {
            return Err(FactoryError::Validation(
                "target_agent_name cannot be empty".into(),
            ));
        }
        Ok(connection)
    }
}

/// Request to deploy an agent to a managed runtime
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployAgentRequest {
    /// Agent name
    pub name: String,
    /// What the agent is for
    pub purpose: String,
    /// Declared capabilities
    pub capabilities: Vec<String>,
    /// System prompt injected into the generic runtime
    pub system_prompt: String,
    /// Gateway id; presence makes this a server agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    /// Enable the built-in code interpreter tool
    #[serde(default)]
    pub enable_code_interpreter: bool,
    /// Enable the built-in browser tool
    #[serde(default)]
    pub enable_browser: bool,
    /// Agent ids this agent can delegate to; makes it a client agent
    #[serde(default)]
    pub known_agent_ids: Vec<String>,
}

/// Summary of a successful deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub agent_id: String,
    pub agent_arn: String,
    pub name: String,
    pub purpose: String,
    pub capabilities: Vec<String>,
    pub status: String,
    pub mode: AgentMode,
    pub enable_code_interpreter: bool,
    pub enable_browser: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
}

/// Discovery view of an A2A-enabled agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredAgent {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_arn: String,
    pub a2a_url: String,
    pub capabilities: Vec<String>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_gateway_wins() {
        let known = vec!["agent-1".to_string()];
        assert_eq!(AgentMode::derive(Some("gw-1"), &known), AgentMode::Server);
        assert_eq!(AgentMode::derive(None, &known), AgentMode::Client);
        assert_eq!(AgentMode::derive(None, &[]), AgentMode::Server);
        // Blank gateway id does not count as a gateway
        assert_eq!(AgentMode::derive(Some("  "), &known), AgentMode::Client);
    }

    #[test]
    fn test_connection_requires_https() {
        let err = A2AConnection::new("a", "b", "http://example.com", "B");
        assert!(err.is_err());
        let ok = A2AConnection::new("a", "b", "https://example.com/a2a", "B");
        assert!(ok.is_ok());
    }

    #[test]
    fn test_connection_rejects_empty_fields() {
        assert!(A2AConnection::new("", "b", "https://example.com", "B").is_err());
        assert!(A2AConnection::new("a", " ", "https://example.com", "B").is_err());
        assert!(A2AConnection::new("a", "b", "https://example.com", "").is_err());
    }
}
