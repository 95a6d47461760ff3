//! In-memory control plane and agent registry
//!
//! Simulates the external control plane with the same surface semantics the
//! services rely on: conflict on duplicate names, not-found on missing ids,
//! idempotent permission grants. Backs the demo mode and the test suite.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    AgentRecord, AgentRegistryPort, ControlPlaneError, CreateFunctionRequest,
    CreateGatewayRequest, CreateRuntimeRequest, FunctionControlPort, FunctionDescriptor,
    GatewayControlPort, GatewayDescriptor, GatewayTargetRequest, InvokePermissionRequest,
    RuntimeControlPort, RuntimeDescriptor, RuntimeSummary,
};

#[derive(Debug, Clone)]
struct StoredGateway {
    name: String,
    gateway_url: String,
}

#[derive(Debug, Clone)]
struct StoredTarget {
    gateway_id: String,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredFunction {
    function_arn: String,
    package: Vec<u8>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredRuntime {
    runtime_id: String,
    runtime_name: String,
    runtime_arn: String,
    status: String,
    environment: HashMap<String, String>,
    server_protocol: Option<String>,
}

#[derive(Default)]
struct State {
    gateways: HashMap<String, StoredGateway>,
    targets: Vec<StoredTarget>,
    functions: HashMap<String, StoredFunction>,
    permissions: HashSet<(String, String)>,
    runtimes: HashMap<String, StoredRuntime>,
    seeded_agents: HashMap<String, AgentRecord>,
}

/// Simulated control plane; deployments complete instantly.
pub struct InMemoryControlPlane {
    region: String,
    state: RwLock<State>,
}

impl InMemoryControlPlane {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: RwLock::new(State::default()),
        }
    }

    fn short_id() -> String {
        Uuid::new_v4().simple().to_string()[..10].to_string()
    }

    /// Seed a registry entry that does not correspond to a simulated
    /// runtime (e.g. an agent deployed by another conversation).
    pub async fn seed_agent(&self, record: AgentRecord) {
        let mut state = self.state.write().await;
        state.seeded_agents.insert(record.agent_id.clone(), record);
    }

    pub async fn gateway_count(&self) -> usize {
        self.state.read().await.gateways.len()
    }

    pub async fn gateway_url(&self, gateway_id: &str) -> Option<String> {
        self.state
            .read()
            .await
            .gateways
            .get(gateway_id)
            .map(|g| g.gateway_url.clone())
    }

    pub async fn target_count(&self, gateway_id: &str) -> usize {
        self.state
            .read()
            .await
            .targets
            .iter()
            .filter(|t| t.gateway_id == gateway_id)
            .count()
    }

    pub async fn permission_count(&self) -> usize {
        self.state.read().await.permissions.len()
    }

    pub async fn function_updated_at(&self, function_name: &str) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .await
            .functions
            .get(function_name)
            .map(|f| f.updated_at)
    }

    /// Deployment package bytes of a stored function, for test inspection.
    pub async fn function_package(&self, function_name: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .await
            .functions
            .get(function_name)
            .map(|f| f.package.clone())
    }

    pub async fn runtime_environment(
        &self,
        runtime_id: &str,
    ) -> Option<HashMap<String, String>> {
        self.state
            .read()
            .await
            .runtimes
            .get(runtime_id)
            .map(|r| r.environment.clone())
    }

    fn record_from_runtime(&self, runtime: &StoredRuntime) -> AgentRecord {
        let capabilities = runtime
            .environment
            .get("AGENT_CAPABILITIES")
            .map(|v| {
                v.split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        let a2a_url = runtime.server_protocol.as_ref().map(|_| {
            format!(
                "https://runtimes.{}.agents.local/{}/a2a",
                self.region, runtime.runtime_id
            )
        });
        AgentRecord {
            agent_id: runtime.runtime_id.clone(),
            agent_name: runtime.runtime_name.clone(),
            agent_arn: runtime.runtime_arn.clone(),
            status: runtime.status.clone(),
            a2a_url,
            capabilities,
        }
    }
}

#[async_trait]
impl GatewayControlPort for InMemoryControlPlane {
    async fn create_gateway(
        &self,
        req: CreateGatewayRequest,
    ) -> Result<GatewayDescriptor, ControlPlaneError> {
        let mut state = self.state.write().await;
        if state.gateways.values().any(|g| g.name == req.name) {
            return Err(ControlPlaneError::Conflict(format!(
                "gateway {} already exists",
                req.name
            )));
        }
        let gateway_id = format!("gw-{}", Self::short_id());
        let gateway_url = format!(
            "https://gateways.{}.agents.local/{}/mcp",
            self.region, gateway_id
        );
        state.gateways.insert(
            gateway_id.clone(),
            StoredGateway {
                name: req.name,
                gateway_url: gateway_url.clone(),
            },
        );
        Ok(GatewayDescriptor {
            gateway_id,
            gateway_url: Some(gateway_url),
        })
    }

    async fn create_gateway_target(
        &self,
        req: GatewayTargetRequest,
    ) -> Result<String, ControlPlaneError> {
        let mut state = self.state.write().await;
        if !state.gateways.contains_key(&req.gateway_id) {
            return Err(ControlPlaneError::NotFound(format!(
                "gateway {} not found",
                req.gateway_id
            )));
        }
        if state
            .targets
            .iter()
            .any(|t| t.gateway_id == req.gateway_id && t.name == req.name)
        {
            return Err(ControlPlaneError::Conflict(format!(
                "target {} already registered",
                req.name
            )));
        }
        let target_id = format!("tgt-{}", Self::short_id());
        state.targets.push(StoredTarget {
            gateway_id: req.gateway_id,
            name: req.name,
        });
        Ok(target_id)
    }
}

#[async_trait]
impl FunctionControlPort for InMemoryControlPlane {
    async fn function_exists(&self, function_name: &str) -> Result<bool, ControlPlaneError> {
        Ok(self.state.read().await.functions.contains_key(function_name))
    }

    async fn create_function(
        &self,
        req: CreateFunctionRequest,
    ) -> Result<FunctionDescriptor, ControlPlaneError> {
        let mut state = self.state.write().await;
        if state.functions.contains_key(&req.function_name) {
            return Err(ControlPlaneError::Conflict(format!(
                "function {} already exists",
                req.function_name
            )));
        }
        let function_arn = format!(
            "arn:aws:lambda:{}:000000000000:function:{}",
            self.region, req.function_name
        );
        state.functions.insert(
            req.function_name.clone(),
            StoredFunction {
                function_arn: function_arn.clone(),
                package: req.package,
                updated_at: Utc::now(),
            },
        );
        Ok(FunctionDescriptor {
            function_arn,
            function_name: req.function_name,
        })
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        package: Vec<u8>,
    ) -> Result<FunctionDescriptor, ControlPlaneError> {
        let mut state = self.state.write().await;
        let function = state.functions.get_mut(function_name).ok_or_else(|| {
            ControlPlaneError::NotFound(format!("function {} not found", function_name))
        })?;
        function.package = package;
        function.updated_at = Utc::now();
        Ok(FunctionDescriptor {
            function_arn: function.function_arn.clone(),
            function_name: function_name.to_string(),
        })
    }

    async fn add_invoke_permission(
        &self,
        req: InvokePermissionRequest,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.write().await;
        if !state.functions.contains_key(&req.function_name) {
            return Err(ControlPlaneError::NotFound(format!(
                "function {} not found",
                req.function_name
            )));
        }
        let key = (req.function_name, req.statement_id);
        if state.permissions.contains(&key) {
            return Err(ControlPlaneError::Conflict(format!(
                "permission {} already exists",
                key.1
            )));
        }
        state.permissions.insert(key);
        Ok(())
    }

    async fn delete_function(&self, function_name: &str) -> Result<(), ControlPlaneError> {
        let mut state = self.state.write().await;
        if state.functions.remove(function_name).is_none() {
            return Err(ControlPlaneError::NotFound(format!(
                "function {} not found",
                function_name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RuntimeControlPort for InMemoryControlPlane {
    async fn create_runtime(
        &self,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError> {
        let mut state = self.state.write().await;
        if state
            .runtimes
            .values()
            .any(|r| r.runtime_name == req.runtime_name)
        {
            return Err(ControlPlaneError::Conflict(format!(
                "runtime {} already exists",
                req.runtime_name
            )));
        }
        let runtime_id = format!("agent-{}", Self::short_id());
        let runtime_arn = format!(
            "arn:aws:agentcore:{}:000000000000:runtime/{}",
            self.region, runtime_id
        );
        let runtime = StoredRuntime {
            runtime_id: runtime_id.clone(),
            runtime_name: req.runtime_name,
            runtime_arn: runtime_arn.clone(),
            status: "READY".to_string(),
            environment: req.environment,
            server_protocol: req.server_protocol,
        };
        state.runtimes.insert(runtime_id.clone(), runtime);
        Ok(RuntimeDescriptor {
            runtime_id,
            runtime_arn,
            status: "READY".to_string(),
        })
    }

    async fn update_runtime(
        &self,
        runtime_id: &str,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError> {
        let mut state = self.state.write().await;
        let runtime = state.runtimes.get_mut(runtime_id).ok_or_else(|| {
            ControlPlaneError::NotFound(format!("runtime {} not found", runtime_id))
        })?;
        runtime.environment = req.environment;
        runtime.server_protocol = req.server_protocol;
        Ok(RuntimeDescriptor {
            runtime_id: runtime.runtime_id.clone(),
            runtime_arn: runtime.runtime_arn.clone(),
            status: runtime.status.clone(),
        })
    }

    async fn update_runtime_environment(
        &self,
        runtime_id: &str,
        environment: HashMap<String, String>,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.write().await;
        let runtime = state.runtimes.get_mut(runtime_id).ok_or_else(|| {
            ControlPlaneError::NotFound(format!("runtime {} not found", runtime_id))
        })?;
        runtime.environment.extend(environment);
        Ok(())
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeSummary>, ControlPlaneError> {
        let state = self.state.read().await;
        Ok(state
            .runtimes
            .values()
            .map(|r| RuntimeSummary {
                runtime_id: r.runtime_id.clone(),
                runtime_name: r.runtime_name.clone(),
                status: r.status.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl AgentRegistryPort for InMemoryControlPlane {
    async fn get_agent(&self, agent_id: &str) -> Result<Option<AgentRecord>, ControlPlaneError> {
        let state = self.state.read().await;
        if let Some(record) = state.seeded_agents.get(agent_id) {
            return Ok(Some(record.clone()));
        }
        Ok(state
            .runtimes
            .get(agent_id)
            .map(|r| self.record_from_runtime(r)))
    }

    async fn get_a2a_agents(&self) -> Result<Vec<AgentRecord>, ControlPlaneError> {
        let state = self.state.read().await;
        let mut agents: Vec<AgentRecord> = state
            .seeded_agents
            .values()
            .filter(|r| r.a2a_url.is_some())
            .cloned()
            .collect();
        agents.extend(
            state
                .runtimes
                .values()
                .filter(|r| r.server_protocol.is_some())
                .map(|r| self.record_from_runtime(r)),
        );
        Ok(agents)
    }
}
