//! REST API handlers for the builder front-end
//!
//! Thin boundary over the session-scoped services. Every operation answers
//! with a structured envelope: a success flag, the operator-facing rendered
//! message, machine-checkable data, and remediation suggestions on failure.
//! Raw transport errors never escape this layer.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{DeployAgentRequest, FactoryError, ToolSpec};
use crate::services::a2a::A2aConnectionService;
use crate::services::deployment::DeploymentService;
use crate::services::gateway::GatewayService;
use crate::services::report;
use crate::services::session::SharedSession;
use crate::services::tools::ToolService;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub session: SharedSession,
    pub gateway: Arc<GatewayService>,
    pub tools: Arc<ToolService>,
    pub deployment: Arc<DeploymentService>,
    pub a2a: Arc<A2aConnectionService>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Operator-facing rendering of the outcome
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            suggestions: Vec::new(),
        }
    }
}

impl ApiResponse<Value> {
    pub fn failure(error: &FactoryError) -> Self {
        Self {
            success: false,
            message: report::render_factory_error(error),
            data: None,
            error: Some(error.error_type()),
            suggestions: error.suggestions().iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGatewayBody {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterToolsBody {
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Deserialize)]
pub struct AddConnectionBody {
    pub source_agent_id: String,
    pub target_agent_id: String,
    pub target_a2a_url: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Reset the one-shot session trackers at the start of a new conversation.
pub async fn reset_session(State(state): State<ApiState>) -> Json<ApiResponse<Value>> {
    state.session.write().await.reset();
    Json(ApiResponse::success("Session reset", json!({})))
}

pub async fn create_gateway(
    State(state): State<ApiState>,
    Json(body): Json<CreateGatewayBody>,
) -> Json<ApiResponse<Value>> {
    match state.gateway.create_gateway(&body.name, &body.description).await {
        Ok(outcome) => Json(ApiResponse::success(
            report::render_gateway_outcome(&outcome),
            json!(outcome),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn register_tools(
    State(state): State<ApiState>,
    Path(gateway_id): Path<String>,
    Json(body): Json<RegisterToolsBody>,
) -> Json<ApiResponse<Value>> {
    match state.tools.register_tools(&gateway_id, &body.tools).await {
        Ok(batch) => Json(ApiResponse::success(
            report::render_registration_report(&batch),
            json!(batch),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn deploy_agent(
    State(state): State<ApiState>,
    Json(body): Json<DeployAgentRequest>,
) -> Json<ApiResponse<Value>> {
    match state.deployment.deploy_agent(body).await {
        Ok(outcome) => Json(ApiResponse::success(
            report::render_deploy_outcome(&outcome),
            json!(outcome),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn list_agents(State(state): State<ApiState>) -> Json<ApiResponse<Value>> {
    match state.deployment.list_deployed_agents().await {
        Ok(agents) => Json(ApiResponse::success(
            report::render_agent_listing(&agents),
            json!(agents),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn discover_agents(State(state): State<ApiState>) -> Json<ApiResponse<Value>> {
    match state.a2a.discover_agents().await {
        Ok(agents) => Json(ApiResponse::success(
            report::render_discovered_agents(&agents),
            json!(agents),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn add_connection(
    State(state): State<ApiState>,
    Json(body): Json<AddConnectionBody>,
) -> Json<ApiResponse<Value>> {
    match state
        .a2a
        .add_connection(
            &body.source_agent_id,
            &body.target_agent_id,
            &body.target_a2a_url,
        )
        .await
    {
        Ok(connection) => Json(ApiResponse::success(
            report::render_connection_added(&connection),
            json!(connection),
        )),
        Err(e) => Json(ApiResponse::failure(&e)),
    }
}

pub async fn get_connections(
    State(state): State<ApiState>,
    Path(agent_id): Path<String>,
) -> Json<ApiResponse<Value>> {
    let connections = state.a2a.get_connections(&agent_id).await;
    Json(ApiResponse::success(
        format!("{} connection(s)", connections.len()),
        json!(connections),
    ))
}
