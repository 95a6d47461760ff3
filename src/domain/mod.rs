//! Domain types for the agent factory
//!
//! Core abstractions: validated data types, the name sanitizer, and the
//! port traits through which session-scoped services reach the external
//! control plane and agent registry.

pub mod agent;
pub mod error;
pub mod name;
pub mod tool_spec;
pub mod validate;

pub use agent::*;
pub use error::*;
pub use name::*;
pub use tool_spec::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Request to create a tool-hosting gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGatewayRequest {
    /// Sanitized gateway name
    pub name: String,
    pub description: String,
    /// Execution role assumed by the gateway
    pub role_arn: String,
    /// Tool-hosting protocol (MCP)
    pub protocol_type: String,
    /// Protocol versions the gateway must accept
    pub supported_versions: Vec<String>,
    /// Authorization scheme for inbound calls
    pub authorizer_type: String,
}

/// Gateway identity returned by the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayDescriptor {
    pub gateway_id: String,
    /// Service endpoint for the gateway, when the control plane reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
}

/// Registration of a backend function as a named tool behind a gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTargetRequest {
    pub gateway_id: String,
    /// Sanitized target name
    pub name: String,
    pub description: String,
    /// Backing function reference
    pub function_arn: String,
    /// Tool schema embedded inline with the registration
    pub tool_name: String,
    pub tool_description: String,
    pub input_schema: Value,
}

/// Request to create a backend compute function
#[derive(Debug, Clone)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub description: String,
    pub role_arn: String,
    /// Language runtime for the synthesized handler
    pub runtime: String,
    /// Entry point within the deployment package
    pub handler: String,
    /// Deployment archive bytes
    pub package: Vec<u8>,
    pub timeout_seconds: u32,
    pub memory_mb: u32,
    /// Flat configuration exposed to the handler
    pub environment: HashMap<String, String>,
}

/// Function identity returned by the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub function_arn: String,
    pub function_name: String,
}

/// Grant allowing a specific gateway to invoke a function.
///
/// Provider-specific principal/ARN construction happens in the adapter;
/// the service only knows which gateway needs access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokePermissionRequest {
    pub function_name: String,
    pub statement_id: String,
    pub gateway_id: String,
}

/// Request to create or update a managed agent runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRuntimeRequest {
    /// Sanitized runtime name
    pub runtime_name: String,
    /// Pre-built generic agent container image
    pub container_uri: String,
    pub role_arn: String,
    pub network_mode: String,
    /// Environment contract injecting the agent's behavior
    pub environment: HashMap<String, String>,
    /// Serving protocol; `Some("A2A")` for server agents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_protocol: Option<String>,
}

/// Runtime identity returned by the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeDescriptor {
    pub runtime_id: String,
    pub runtime_arn: String,
    pub status: String,
}

/// Listing view of a managed runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSummary {
    pub runtime_id: String,
    pub runtime_name: String,
    pub status: String,
}

/// Port to the gateway control plane
#[async_trait]
pub trait GatewayControlPort: Send + Sync {
    /// Create a gateway; conflicts on duplicate names.
    async fn create_gateway(
        &self,
        req: CreateGatewayRequest,
    ) -> Result<GatewayDescriptor, ControlPlaneError>;

    /// Register a function as a tool target behind a gateway.
    async fn create_gateway_target(
        &self,
        req: GatewayTargetRequest,
    ) -> Result<String, ControlPlaneError>;
}

/// Port to the compute function control plane
#[async_trait]
pub trait FunctionControlPort: Send + Sync {
    async fn function_exists(&self, function_name: &str) -> Result<bool, ControlPlaneError>;

    /// Create a function; conflicts on duplicate names.
    async fn create_function(
        &self,
        req: CreateFunctionRequest,
    ) -> Result<FunctionDescriptor, ControlPlaneError>;

    /// Replace the code of an existing function.
    async fn update_function_code(
        &self,
        function_name: &str,
        package: Vec<u8>,
    ) -> Result<FunctionDescriptor, ControlPlaneError>;

    /// Grant a gateway permission to invoke a function. Granting an already
    /// existing permission yields `ControlPlaneError::Conflict`.
    async fn add_invoke_permission(
        &self,
        req: InvokePermissionRequest,
    ) -> Result<(), ControlPlaneError>;

    async fn delete_function(&self, function_name: &str) -> Result<(), ControlPlaneError>;
}

/// Port to the agent runtime control plane
#[async_trait]
pub trait RuntimeControlPort: Send + Sync {
    /// Create a runtime; conflicts on duplicate names.
    async fn create_runtime(
        &self,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError>;

    /// Update an existing runtime in place.
    async fn update_runtime(
        &self,
        runtime_id: &str,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError>;

    /// Merge new values into a runtime's environment contract.
    async fn update_runtime_environment(
        &self,
        runtime_id: &str,
        environment: HashMap<String, String>,
    ) -> Result<(), ControlPlaneError>;

    async fn list_runtimes(&self) -> Result<Vec<RuntimeSummary>, ControlPlaneError>;
}

/// Read-only port to the agent registry
#[async_trait]
pub trait AgentRegistryPort: Send + Sync {
    async fn get_agent(&self, agent_id: &str) -> Result<Option<AgentRecord>, ControlPlaneError>;

    /// All agents exposing an A2A endpoint.
    async fn get_a2a_agents(&self) -> Result<Vec<AgentRecord>, ControlPlaneError>;
}
