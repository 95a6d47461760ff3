//! REST boundary tests driving the router directly.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use ergane::adapters::api_handler::ApiState;
use ergane::adapters::in_memory::InMemoryControlPlane;
use ergane::config::{ControlPlaneSettings, PlatformSettings, ServerSettings, Settings};
use ergane::services::a2a::A2aConnectionService;
use ergane::services::deployment::DeploymentService;
use ergane::services::gateway::GatewayService;
use ergane::services::session::new_shared_session;
use ergane::services::tools::ToolService;

fn test_app() -> axum::Router {
    let settings = Arc::new(Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        platform: PlatformSettings {
            execution_role_arn: "arn:aws:iam::123456789012:role/FactoryRole".to_string(),
            container_repository: "000000000000.dkr.ecr.us-west-2.amazonaws.com/agents".to_string(),
            ..PlatformSettings::default()
        },
        control_plane: ControlPlaneSettings::default(),
    });
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let session = new_shared_session();
    let state = ApiState {
        session: session.clone(),
        gateway: Arc::new(GatewayService::new(
            plane.clone(),
            settings.clone(),
            session.clone(),
        )),
        tools: Arc::new(ToolService::new(
            plane.clone(),
            plane.clone(),
            settings.clone(),
        )),
        deployment: Arc::new(DeploymentService::new(plane.clone(), settings, session)),
        a2a: Arc::new(A2aConnectionService::new(plane.clone(), plane)),
    };
    ergane::create_app(state)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_gateway_tools_agent_flow() {
    let app = test_app();

    // Create gateway
    let (status, body) = post_json(
        &app,
        "/api/gateways",
        json!({ "name": "Order Gateway", "description": "Order tools" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let gateway_id = body["data"]["gateway_id"].as_str().unwrap().to_string();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("GATEWAY CREATED SUCCESSFULLY"));

    // Duplicate is blocked, but still a handled outcome
    let (_, body) = post_json(
        &app,
        "/api/gateways",
        json!({ "name": "Second", "description": "nope" }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["outcome"], "duplicate_blocked");

    // Register a tool
    let (_, body) = post_json(
        &app,
        &format!("/api/gateways/{}/tools", gateway_id),
        json!({
            "tools": [{
                "name": "add",
                "description": "Add two numbers together",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "a": {"type": "number"},
                        "b": {"type": "number"}
                    },
                    "required": ["a", "b"]
                },
                "handler_code": "return {\"sum\": parameters.get(\"a\", 0) + parameters.get(\"b\", 0)}"
            }]
        }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 1);

    // Deploy an agent against the gateway
    let (_, body) = post_json(
        &app,
        "/api/agents",
        json!({
            "name": "CalcBot",
            "purpose": "Math helper",
            "capabilities": ["calculation"],
            "system_prompt": "You help with math",
            "gateway_id": gateway_id,
        }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["outcome"], "deployed");
    assert_eq!(body["data"]["mode"], "server");

    // Listing shows the READY agent
    let (_, body) = get_json(&app, "/api/agents").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Discovery exposes the server agent's A2A endpoint
    let (_, body) = get_json(&app, "/api/agents/discover").await;
    assert_eq!(body["success"], true);
    let agents = body["data"].as_array().unwrap();
    assert_eq!(agents.len(), 1);
    assert!(agents[0]["a2a_url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn test_session_reset_allows_new_deployment() {
    let app = test_app();

    let deploy = json!({
        "name": "CalcBot",
        "purpose": "Math helper",
        "capabilities": ["calculation"],
        "system_prompt": "You help with math",
    });
    let (_, body) = post_json(&app, "/api/agents", deploy.clone()).await;
    assert_eq!(body["data"]["outcome"], "deployed");

    let (_, body) = post_json(&app, "/api/agents", deploy.clone()).await;
    assert_eq!(body["data"]["outcome"], "duplicate_blocked");

    // A reset bounds the session to a new conversation
    let (_, body) = post_json(&app, "/api/session/reset", json!({})).await;
    assert_eq!(body["success"], true);

    let mut second = deploy;
    second["name"] = json!("OtherBot");
    let (_, body) = post_json(&app, "/api/agents", second).await;
    assert_eq!(body["data"]["outcome"], "deployed");
}

#[tokio::test]
async fn test_invalid_connection_reports_error_envelope() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/api/connections",
        json!({
            "source_agent_id": "a",
            "target_agent_id": "b",
            "target_a2a_url": "http://insecure.example.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation Error");
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}
