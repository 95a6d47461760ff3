//! Agent deployment management
//!
//! Deploys agents onto the pre-built generic runtime container. Behavior is
//! injected through a flat environment contract rather than by building a
//! bespoke image per agent. One deployment per session; a name conflict
//! turns into an in-place update of the existing runtime.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::domain::{
    name::{sanitize, ResourceKind},
    validate::{validate_capabilities, validate_system_prompt},
    AgentMode, ControlPlaneError, CreateRuntimeRequest, DeployAgentRequest, DeploymentSummary,
    FactoryError, FactoryResult, RuntimeControlPort, RuntimeSummary,
};

use super::session::SharedSession;

/// Tag of the generic agent container within the configured repository
const GENERIC_AGENT_TAG: &str = "generic-agent-a2a";
const NETWORK_MODE_PUBLIC: &str = "PUBLIC";
const A2A_PROTOCOL: &str = "A2A";

/// Result of a deployment attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeployOutcome {
    Deployed(DeploymentSummary),
    /// An existing runtime with the same name was updated in place
    Updated { agent_id: String, name: String },
    /// One-shot guard tripped; informational, not a failure
    DuplicateBlocked { agent_name: String },
}

/// Session-scoped agent deployment manager
pub struct DeploymentService {
    runtimes: Arc<dyn RuntimeControlPort>,
    settings: Arc<Settings>,
    session: SharedSession,
}

impl DeploymentService {
    pub fn new(
        runtimes: Arc<dyn RuntimeControlPort>,
        settings: Arc<Settings>,
        session: SharedSession,
    ) -> Self {
        Self {
            runtimes,
            settings,
            session,
        }
    }

    /// Deploy an agent to a managed runtime.
    ///
    /// Session state machine: not-deployed → deployed, one-shot. Mode is
    /// derived from the request (gateway wins over known agents). Failures
    /// are classified and never propagate as raw transport errors.
    pub async fn deploy_agent(&self, req: DeployAgentRequest) -> FactoryResult<DeployOutcome> {
        let mut session = self.session.write().await;

        if session.deployment.deployed {
            warn!(
                existing = session.deployment.agent_name.as_deref().unwrap_or(""),
                "duplicate deployment blocked"
            );
            return Ok(DeployOutcome::DuplicateBlocked {
                agent_name: session.deployment.agent_name.clone().unwrap_or_default(),
            });
        }

        validate_system_prompt(&req.system_prompt)?;
        validate_capabilities(&req.capabilities)?;

        let platform = &self.settings.platform;
        let execution_role = platform.execution_role_arn.trim();
        if execution_role.is_empty() {
            return Err(FactoryError::configuration(
                "execution role ARN not configured",
            ));
        }

        let runtime_name = sanitize(&req.name, ResourceKind::Runtime);
        let container_uri = format!("{}:{}", platform.container_repository, GENERIC_AGENT_TAG);
        let mode = AgentMode::derive(req.gateway_id.as_deref(), &req.known_agent_ids);

        info!(agent = %req.name, runtime = %runtime_name, %mode, "deploying agent runtime");

        let environment = build_environment(platform, &req, mode);
        let runtime_request = CreateRuntimeRequest {
            runtime_name: runtime_name.clone(),
            container_uri,
            role_arn: execution_role.to_string(),
            network_mode: NETWORK_MODE_PUBLIC.to_string(),
            environment,
            // Server agents expose an A2A endpoint; clients use plain
            // runtime invocation
            server_protocol: (mode == AgentMode::Server).then(|| A2A_PROTOCOL.to_string()),
        };

        match self.runtimes.create_runtime(runtime_request.clone()).await {
            Ok(descriptor) => {
                session.deployment.mark_deployed(req.name.as_str());
                info!(agent_id = %descriptor.runtime_id, "agent deployed");
                Ok(DeployOutcome::Deployed(DeploymentSummary {
                    agent_id: descriptor.runtime_id,
                    agent_arn: descriptor.runtime_arn,
                    name: req.name,
                    purpose: req.purpose,
                    capabilities: req.capabilities,
                    status: descriptor.status,
                    mode,
                    enable_code_interpreter: req.enable_code_interpreter,
                    enable_browser: req.enable_browser,
                    gateway_id: req.gateway_id,
                }))
            }
            Err(ControlPlaneError::Conflict(_)) => {
                info!(runtime = %runtime_name, "runtime exists, updating in place");
                let existing = self.find_runtime(&runtime_name).await?;
                match existing {
                    Some(existing) => {
                        self.runtimes
                            .update_runtime(&existing.runtime_id, runtime_request)
                            .await
                            .map_err(|e| FactoryError::deployment_from_message(e.to_string()))?;
                        session.deployment.mark_deployed(req.name.as_str());
                        Ok(DeployOutcome::Updated {
                            agent_id: existing.runtime_id,
                            name: req.name,
                        })
                    }
                    None => Err(FactoryError::deployment_from_message(format!(
                        "runtime {} exists but could not be found; try a different name",
                        runtime_name
                    ))),
                }
            }
            Err(e) => Err(FactoryError::deployment_from_message(e.to_string())),
        }
    }

    /// List deployed agents that are ready to serve.
    pub async fn list_deployed_agents(&self) -> FactoryResult<Vec<RuntimeSummary>> {
        let runtimes = self
            .runtimes
            .list_runtimes()
            .await
            .map_err(|e| FactoryError::deployment_from_message(e.to_string()))?;
        Ok(runtimes
            .into_iter()
            .filter(|r| r.status == "READY")
            .collect())
    }

    async fn find_runtime(&self, runtime_name: &str) -> FactoryResult<Option<RuntimeSummary>> {
        let runtimes = self
            .runtimes
            .list_runtimes()
            .await
            .map_err(|e| FactoryError::deployment_from_message(e.to_string()))?;
        Ok(runtimes.into_iter().find(|r| r.runtime_name == runtime_name))
    }
}

/// Build the flat environment contract injected into the generic runtime.
///
/// Everything the runtime needs to become this agent travels here as
/// string key/value pairs.
pub fn build_environment(
    platform: &crate::config::PlatformSettings,
    req: &DeployAgentRequest,
    mode: AgentMode,
) -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("AWS_REGION".to_string(), platform.region.clone());
    env.insert("MODEL_ID".to_string(), platform.model_id.clone());
    env.insert("SYSTEM_PROMPT".to_string(), req.system_prompt.clone());
    env.insert("AGENT_NAME".to_string(), req.name.clone());
    env.insert("AGENT_PURPOSE".to_string(), req.purpose.clone());
    env.insert(
        "AGENT_CAPABILITIES".to_string(),
        req.capabilities.join(","),
    );
    env.insert("AGENT_MODE".to_string(), mode.to_string());
    env.insert(
        "ENABLE_CODE_INTERPRETER".to_string(),
        req.enable_code_interpreter.to_string(),
    );
    env.insert("ENABLE_BROWSER".to_string(), req.enable_browser.to_string());
    env.insert(
        "KNOWN_AGENT_IDS".to_string(),
        req.known_agent_ids.join(","),
    );
    env.insert("MEMORY_ID".to_string(), platform.memory_id.clone());
    env.insert(
        "GATEWAY_ID".to_string(),
        req.gateway_id.clone().unwrap_or_default(),
    );
    env
}
