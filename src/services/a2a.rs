//! Agent-to-Agent connection management
//!
//! Maintains, per source agent, the set of validated outbound links to
//! target agents, and synchronizes the source agent's runtime environment
//! with its current connection set. Connections live in memory for the
//! life of the hosting process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{
    validate::validate_a2a_url, A2AConnection, AgentRegistryPort, DiscoveredAgent, FactoryError,
    FactoryResult, RuntimeControlPort,
};

/// Environment key carrying the comma-joined A2A endpoints a source agent
/// may delegate to
pub const KNOWN_AGENT_URLS_KEY: &str = "KNOWN_AGENT_URLS";

/// A2A connection service, shared across call sites via `Arc`
pub struct A2aConnectionService {
    registry: Arc<dyn AgentRegistryPort>,
    runtimes: Arc<dyn RuntimeControlPort>,
    connections: RwLock<HashMap<String, Vec<A2AConnection>>>,
}

impl A2aConnectionService {
    pub fn new(
        registry: Arc<dyn AgentRegistryPort>,
        runtimes: Arc<dyn RuntimeControlPort>,
    ) -> Self {
        Self {
            registry,
            runtimes,
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Add (or replace) the connection from `source_agent_id` to
    /// `target_agent_id`.
    ///
    /// The URL is validated before any state changes; an invalid URL never
    /// mutates the connection map. At most one connection exists per
    /// (source, target) pair; re-adding replaces the previous one. After
    /// storing, the source agent's runtime environment is refreshed with
    /// the full connection set (best-effort).
    pub async fn add_connection(
        &self,
        source_agent_id: &str,
        target_agent_id: &str,
        target_a2a_url: &str,
    ) -> FactoryResult<A2AConnection> {
        info!(source = %source_agent_id, target = %target_agent_id, "adding A2A connection");

        validate_a2a_url(target_a2a_url)?;

        let target = self
            .registry
            .get_agent(target_agent_id)
            .await
            .map_err(|e| FactoryError::Connection(format!("registry lookup failed: {}", e)))?
            .ok_or_else(|| {
                FactoryError::Connection(format!(
                    "Target agent not found in registry: {}",
                    target_agent_id
                ))
            })?;

        // Construction re-validates every field
        let connection = A2AConnection::new(
            source_agent_id,
            target_agent_id,
            target_a2a_url,
            target.agent_name.as_str(),
        )?;

        {
            let mut connections = self.connections.write().await;
            let entry = connections
                .entry(source_agent_id.to_string())
                .or_default();
            let had_existing = entry
                .iter()
                .any(|c| c.target_agent_id == target_agent_id);
            if had_existing {
                info!(target = %target_agent_id, "connection already exists, replacing");
                entry.retain(|c| c.target_agent_id != target_agent_id);
            }
            entry.push(connection.clone());
        }

        info!(
            source = %source_agent_id,
            target = %target.agent_name,
            "A2A connection added"
        );

        self.push_environment(source_agent_id).await;

        Ok(connection)
    }

    /// Current outbound connections for an agent; empty if none.
    pub async fn get_connections(&self, agent_id: &str) -> Vec<A2AConnection> {
        let connections = self.connections.read().await;
        connections.get(agent_id).cloned().unwrap_or_default()
    }

    /// Discover every agent exposing an A2A endpoint.
    pub async fn discover_agents(&self) -> FactoryResult<Vec<DiscoveredAgent>> {
        info!("discovering A2A-enabled agents");
        let records = self
            .registry
            .get_a2a_agents()
            .await
            .map_err(|e| FactoryError::Discovery(format!("Failed to discover agents: {}", e)))?;

        let agents: Vec<DiscoveredAgent> = records
            .into_iter()
            .filter_map(|record| {
                let a2a_url = record.a2a_url?;
                Some(DiscoveredAgent {
                    agent_id: record.agent_id,
                    agent_name: record.agent_name,
                    agent_arn: record.agent_arn,
                    a2a_url,
                    capabilities: record.capabilities,
                    status: record.status,
                })
            })
            .collect();

        info!(count = agents.len(), "discovered A2A-enabled agents");
        Ok(agents)
    }

    /// Refresh the source agent's runtime environment with the
    /// comma-joined endpoint list of its current connections.
    ///
    /// Best-effort: a failed push is logged and does not fail the calling
    /// operation; the next environment update carries the same data.
    async fn push_environment(&self, agent_id: &str) {
        let connections = self.get_connections(agent_id).await;
        if connections.is_empty() {
            debug!(agent = %agent_id, "no connections to push");
            return;
        }

        let known_agent_urls: Vec<String> = connections
            .iter()
            .map(|c| c.target_a2a_url.clone())
            .collect();
        let joined = known_agent_urls.join(",");

        let source = match self.registry.get_agent(agent_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(agent = %agent_id, "source agent not in registry, skipping environment push");
                return;
            }
            Err(e) => {
                warn!(agent = %agent_id, error = %e, "registry lookup failed, skipping environment push");
                return;
            }
        };

        let mut environment = HashMap::new();
        environment.insert(KNOWN_AGENT_URLS_KEY.to_string(), joined);

        match self
            .runtimes
            .update_runtime_environment(&source.agent_id, environment)
            .await
        {
            Ok(()) => info!(
                agent = %agent_id,
                connections = connections.len(),
                "runtime environment updated with known agent endpoints"
            ),
            Err(e) => warn!(
                agent = %agent_id,
                error = %e,
                "best-effort environment push failed"
            ),
        }
    }
}
