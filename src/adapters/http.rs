//! HTTP control-plane client
//!
//! Talks to a remote control plane over its JSON REST surface. Each port
//! method maps to one request; 409 and 404 responses become the typed
//! conflict/not-found errors the services branch on. Deployment packages
//! travel base64-encoded inside the JSON body.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use crate::domain::{
    AgentRecord, AgentRegistryPort, ControlPlaneError, CreateFunctionRequest,
    CreateGatewayRequest, CreateRuntimeRequest, FunctionControlPort, FunctionDescriptor,
    GatewayControlPort, GatewayDescriptor, GatewayTargetRequest, InvokePermissionRequest,
    RuntimeControlPort, RuntimeDescriptor, RuntimeSummary,
};

/// Remote control plane reached over HTTPS
pub struct HttpControlPlane {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpControlPlane {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ControlPlaneError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            409 => Err(ControlPlaneError::Conflict(body)),
            404 => Err(ControlPlaneError::NotFound(body)),
            _ => Err(ControlPlaneError::Api(format!("{}: {}", status, body))),
        }
    }
}

#[derive(Deserialize)]
struct GatewayResponse {
    gateway_id: String,
    #[serde(default)]
    gateway_url: Option<String>,
}

#[derive(Deserialize)]
struct TargetResponse {
    target_id: String,
}

#[derive(Deserialize)]
struct FunctionResponse {
    function_arn: String,
    function_name: String,
}

#[derive(Deserialize)]
struct RuntimeResponse {
    runtime_id: String,
    runtime_arn: String,
    status: String,
}

#[derive(Deserialize)]
struct RuntimeListResponse {
    runtimes: Vec<RuntimeSummary>,
}

#[derive(Deserialize)]
struct AgentListResponse {
    agents: Vec<AgentRecord>,
}

#[async_trait]
impl GatewayControlPort for HttpControlPlane {
    async fn create_gateway(
        &self,
        req: CreateGatewayRequest,
    ) -> Result<GatewayDescriptor, ControlPlaneError> {
        let resp = self
            .request(reqwest::Method::POST, "/v1/gateways")
            .json(&req)
            .send()
            .await?;
        let gateway: GatewayResponse = Self::check(resp).await?.json().await?;
        Ok(GatewayDescriptor {
            gateway_id: gateway.gateway_id,
            gateway_url: gateway.gateway_url,
        })
    }

    async fn create_gateway_target(
        &self,
        req: GatewayTargetRequest,
    ) -> Result<String, ControlPlaneError> {
        let path = format!("/v1/gateways/{}/targets", req.gateway_id);
        let resp = self
            .request(reqwest::Method::POST, &path)
            .json(&req)
            .send()
            .await?;
        let target: TargetResponse = Self::check(resp).await?.json().await?;
        Ok(target.target_id)
    }
}

#[async_trait]
impl FunctionControlPort for HttpControlPlane {
    async fn function_exists(&self, function_name: &str) -> Result<bool, ControlPlaneError> {
        let path = format!("/v1/functions/{}", function_name);
        let resp = self.request(reqwest::Method::GET, &path).send().await?;
        match Self::check(resp).await {
            Ok(_) => Ok(true),
            Err(ControlPlaneError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_function(
        &self,
        req: CreateFunctionRequest,
    ) -> Result<FunctionDescriptor, ControlPlaneError> {
        let package = base64::engine::general_purpose::STANDARD.encode(&req.package);
        let body = json!({
            "function_name": req.function_name,
            "description": req.description,
            "role_arn": req.role_arn,
            "runtime": req.runtime,
            "handler": req.handler,
            "package": package,
            "timeout_seconds": req.timeout_seconds,
            "memory_mb": req.memory_mb,
            "environment": req.environment,
        });
        let resp = self
            .request(reqwest::Method::POST, "/v1/functions")
            .json(&body)
            .send()
            .await?;
        let function: FunctionResponse = Self::check(resp).await?.json().await?;
        Ok(FunctionDescriptor {
            function_arn: function.function_arn,
            function_name: function.function_name,
        })
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        package: Vec<u8>,
    ) -> Result<FunctionDescriptor, ControlPlaneError> {
        let path = format!("/v1/functions/{}/code", function_name);
        let body = json!({
            "package": base64::engine::general_purpose::STANDARD.encode(&package),
        });
        let resp = self
            .request(reqwest::Method::PUT, &path)
            .json(&body)
            .send()
            .await?;
        let function: FunctionResponse = Self::check(resp).await?.json().await?;
        Ok(FunctionDescriptor {
            function_arn: function.function_arn,
            function_name: function.function_name,
        })
    }

    async fn add_invoke_permission(
        &self,
        req: InvokePermissionRequest,
    ) -> Result<(), ControlPlaneError> {
        let path = format!("/v1/functions/{}/permissions", req.function_name);
        let resp = self
            .request(reqwest::Method::POST, &path)
            .json(&req)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete_function(&self, function_name: &str) -> Result<(), ControlPlaneError> {
        let path = format!("/v1/functions/{}", function_name);
        let resp = self.request(reqwest::Method::DELETE, &path).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl RuntimeControlPort for HttpControlPlane {
    async fn create_runtime(
        &self,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError> {
        let resp = self
            .request(reqwest::Method::POST, "/v1/runtimes")
            .json(&req)
            .send()
            .await?;
        let runtime: RuntimeResponse = Self::check(resp).await?.json().await?;
        Ok(RuntimeDescriptor {
            runtime_id: runtime.runtime_id,
            runtime_arn: runtime.runtime_arn,
            status: runtime.status,
        })
    }

    async fn update_runtime(
        &self,
        runtime_id: &str,
        req: CreateRuntimeRequest,
    ) -> Result<RuntimeDescriptor, ControlPlaneError> {
        let path = format!("/v1/runtimes/{}", runtime_id);
        let resp = self
            .request(reqwest::Method::PUT, &path)
            .json(&req)
            .send()
            .await?;
        let runtime: RuntimeResponse = Self::check(resp).await?.json().await?;
        Ok(RuntimeDescriptor {
            runtime_id: runtime.runtime_id,
            runtime_arn: runtime.runtime_arn,
            status: runtime.status,
        })
    }

    async fn update_runtime_environment(
        &self,
        runtime_id: &str,
        environment: HashMap<String, String>,
    ) -> Result<(), ControlPlaneError> {
        let path = format!("/v1/runtimes/{}/environment", runtime_id);
        let resp = self
            .request(reqwest::Method::PATCH, &path)
            .json(&json!({ "environment": environment }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_runtimes(&self) -> Result<Vec<RuntimeSummary>, ControlPlaneError> {
        let resp = self
            .request(reqwest::Method::GET, "/v1/runtimes")
            .send()
            .await?;
        let list: RuntimeListResponse = Self::check(resp).await?.json().await?;
        Ok(list.runtimes)
    }
}

#[async_trait]
impl AgentRegistryPort for HttpControlPlane {
    async fn get_agent(&self, agent_id: &str) -> Result<Option<AgentRecord>, ControlPlaneError> {
        let path = format!("/v1/agents/{}", agent_id);
        let resp = self.request(reqwest::Method::GET, &path).send().await?;
        match Self::check(resp).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(ControlPlaneError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_a2a_agents(&self) -> Result<Vec<AgentRecord>, ControlPlaneError> {
        let resp = self
            .request(reqwest::Method::GET, "/v1/agents?a2a=true")
            .send()
            .await?;
        let list: AgentListResponse = Self::check(resp).await?.json().await?;
        Ok(list.agents)
    }
}
