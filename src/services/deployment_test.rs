use std::sync::Arc;

use crate::adapters::in_memory::InMemoryControlPlane;
use crate::config::{ControlPlaneSettings, PlatformSettings, ServerSettings, Settings};
use crate::domain::{
    AgentMode, CreateRuntimeRequest, DeployAgentRequest, FactoryError, RuntimeControlPort,
};
use crate::services::deployment::{DeployOutcome, DeploymentService};
use crate::services::session::new_shared_session;

fn test_settings() -> Arc<Settings> {
    Arc::new(Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        platform: PlatformSettings {
            execution_role_arn: "arn:aws:iam::123456789012:role/FactoryRole".to_string(),
            container_repository: "000000000000.dkr.ecr.us-west-2.amazonaws.com/agents".to_string(),
            memory_id: "factory_memory".to_string(),
            ..PlatformSettings::default()
        },
        control_plane: ControlPlaneSettings::default(),
    })
}

fn deploy_request() -> DeployAgentRequest {
    DeployAgentRequest {
        name: "CalcBot".to_string(),
        purpose: "Math helper".to_string(),
        capabilities: vec!["calculation".to_string()],
        system_prompt: "You help with math problems.".to_string(),
        gateway_id: None,
        enable_code_interpreter: false,
        enable_browser: false,
        known_agent_ids: vec![],
    }
}

#[tokio::test]
async fn test_deploy_server_agent() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    let mut req = deploy_request();
    req.gateway_id = Some("gw-1".to_string());

    let outcome = service.deploy_agent(req).await.unwrap();
    let summary = match outcome {
        DeployOutcome::Deployed(summary) => summary,
        other => panic!("expected Deployed, got {:?}", other),
    };
    assert_eq!(summary.mode, AgentMode::Server);
    assert_eq!(summary.name, "CalcBot");
    assert!(summary.agent_arn.starts_with("arn:"));

    let env = plane.runtime_environment(&summary.agent_id).await.unwrap();
    assert_eq!(env.get("AGENT_MODE").unwrap(), "server");
    assert_eq!(env.get("GATEWAY_ID").unwrap(), "gw-1");
    assert_eq!(env.get("AGENT_NAME").unwrap(), "CalcBot");
    assert_eq!(env.get("AGENT_CAPABILITIES").unwrap(), "calculation");
    assert_eq!(env.get("MEMORY_ID").unwrap(), "factory_memory");
    assert_eq!(env.get("ENABLE_CODE_INTERPRETER").unwrap(), "false");
}

#[tokio::test]
async fn test_gateway_takes_precedence_over_known_agents() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    let mut req = deploy_request();
    req.gateway_id = Some("gw-1".to_string());
    req.known_agent_ids = vec!["agent-x".to_string(), "agent-y".to_string()];

    let outcome = service.deploy_agent(req).await.unwrap();
    match outcome {
        DeployOutcome::Deployed(summary) => {
            assert_eq!(summary.mode, AgentMode::Server);
            let env = plane.runtime_environment(&summary.agent_id).await.unwrap();
            // Known agent ids still travel in the environment contract
            assert_eq!(env.get("KNOWN_AGENT_IDS").unwrap(), "agent-x,agent-y");
        }
        other => panic!("expected Deployed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_mode_from_known_agents() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    let mut req = deploy_request();
    req.known_agent_ids = vec!["agent-x".to_string()];

    match service.deploy_agent(req).await.unwrap() {
        DeployOutcome::Deployed(summary) => assert_eq!(summary.mode, AgentMode::Client),
        other => panic!("expected Deployed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_deployment_blocked() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    service.deploy_agent(deploy_request()).await.unwrap();

    let mut second = deploy_request();
    second.name = "OtherBot".to_string();
    match service.deploy_agent(second).await.unwrap() {
        DeployOutcome::DuplicateBlocked { agent_name } => assert_eq!(agent_name, "CalcBot"),
        other => panic!("expected DuplicateBlocked, got {:?}", other),
    }
    // Only the first runtime exists
    assert_eq!(plane.list_runtimes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_name_conflict_updates_existing_runtime() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));

    // A runtime with the sanitized name already exists
    let existing = plane
        .create_runtime(CreateRuntimeRequest {
            runtime_name: "CalcBot".to_string(),
            container_uri: "repo:generic-agent-a2a".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/FactoryRole".to_string(),
            network_mode: "PUBLIC".to_string(),
            environment: Default::default(),
            server_protocol: None,
        })
        .await
        .unwrap();

    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());
    match service.deploy_agent(deploy_request()).await.unwrap() {
        DeployOutcome::Updated { agent_id, name } => {
            assert_eq!(agent_id, existing.runtime_id);
            assert_eq!(name, "CalcBot");
        }
        other => panic!("expected Updated, got {:?}", other),
    }

    // The update replaced the environment contract
    let env = plane.runtime_environment(&existing.runtime_id).await.unwrap();
    assert_eq!(env.get("AGENT_NAME").unwrap(), "CalcBot");
}

#[tokio::test]
async fn test_validation_before_control_plane() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    let mut req = deploy_request();
    req.system_prompt = "short".to_string();
    let err = service.deploy_agent(req).await.unwrap_err();
    assert!(matches!(err, FactoryError::Validation(_)));
    assert!(plane.list_runtimes().await.unwrap().is_empty());

    let mut req = deploy_request();
    req.capabilities = vec![];
    let err = service.deploy_agent(req).await.unwrap_err();
    assert!(matches!(err, FactoryError::Validation(_)));
}

#[tokio::test]
async fn test_list_filters_to_ready() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = DeploymentService::new(plane.clone(), test_settings(), new_shared_session());

    service.deploy_agent(deploy_request()).await.unwrap();
    let agents = service.list_deployed_agents().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].status, "READY");
}
