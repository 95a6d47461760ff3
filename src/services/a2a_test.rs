use std::sync::Arc;

use crate::adapters::in_memory::InMemoryControlPlane;
use crate::domain::{AgentRecord, CreateRuntimeRequest, FactoryError, RuntimeControlPort};
use crate::services::a2a::{A2aConnectionService, KNOWN_AGENT_URLS_KEY};

fn record(id: &str, name: &str, a2a_url: Option<&str>) -> AgentRecord {
    AgentRecord {
        agent_id: id.to_string(),
        agent_name: name.to_string(),
        agent_arn: format!("arn:aws:agentcore:us-west-2:000000000000:runtime/{}", id),
        status: "READY".to_string(),
        a2a_url: a2a_url.map(|u| u.to_string()),
        capabilities: vec!["support".to_string()],
    }
}

async fn service_with_plane() -> (A2aConnectionService, Arc<InMemoryControlPlane>) {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = A2aConnectionService::new(plane.clone(), plane.clone());
    (service, plane)
}

#[tokio::test]
async fn test_rejects_non_https_url_without_mutation() {
    let (service, plane) = service_with_plane().await;
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;

    let err = service
        .add_connection("source-1", "target-1", "http://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, FactoryError::Validation(_)));
    assert!(service.get_connections("source-1").await.is_empty());
}

#[tokio::test]
async fn test_unknown_target_rejected() {
    let (service, _plane) = service_with_plane().await;

    let err = service
        .add_connection("source-1", "missing", "https://t1.example.com/a2a")
        .await
        .unwrap_err();
    assert!(matches!(err, FactoryError::Connection(_)));
    assert!(service.get_connections("source-1").await.is_empty());
}

#[tokio::test]
async fn test_readd_replaces_connection() {
    let (service, plane) = service_with_plane().await;
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;

    service
        .add_connection("source-1", "target-1", "https://t1.example.com/a2a")
        .await
        .unwrap();
    service
        .add_connection("source-1", "target-1", "https://t1.example.com/v2/a2a")
        .await
        .unwrap();

    let connections = service.get_connections("source-1").await;
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].target_a2a_url, "https://t1.example.com/v2/a2a");
    assert_eq!(connections[0].target_agent_name, "Support Agent");
}

#[tokio::test]
async fn test_connections_isolated_per_source() {
    let (service, plane) = service_with_plane().await;
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;

    service
        .add_connection("source-1", "target-1", "https://t1.example.com/a2a")
        .await
        .unwrap();

    assert_eq!(service.get_connections("source-1").await.len(), 1);
    assert!(service.get_connections("source-2").await.is_empty());
}

#[tokio::test]
async fn test_environment_push_updates_source_runtime() {
    let (service, plane) = service_with_plane().await;

    // The source agent is a live runtime known to the registry
    let source = plane
        .create_runtime(CreateRuntimeRequest {
            runtime_name: "Coordinator".to_string(),
            container_uri: "repo:generic-agent-a2a".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/FactoryRole".to_string(),
            network_mode: "PUBLIC".to_string(),
            environment: Default::default(),
            server_protocol: None,
        })
        .await
        .unwrap();
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;
    plane
        .seed_agent(record("target-2", "Billing Agent", Some("https://t2.example.com/a2a")))
        .await;

    service
        .add_connection(&source.runtime_id, "target-1", "https://t1.example.com/a2a")
        .await
        .unwrap();
    service
        .add_connection(&source.runtime_id, "target-2", "https://t2.example.com/a2a")
        .await
        .unwrap();

    let env = plane.runtime_environment(&source.runtime_id).await.unwrap();
    assert_eq!(
        env.get(KNOWN_AGENT_URLS_KEY).unwrap(),
        "https://t1.example.com/a2a,https://t2.example.com/a2a"
    );
}

#[tokio::test]
async fn test_push_failure_does_not_fail_add() {
    let (service, plane) = service_with_plane().await;
    // Target exists, but the source is only seeded, not a runtime the
    // control plane can update
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;
    plane
        .seed_agent(record("source-1", "Coordinator", None))
        .await;

    let connection = service
        .add_connection("source-1", "target-1", "https://t1.example.com/a2a")
        .await
        .unwrap();
    assert_eq!(connection.target_agent_id, "target-1");
    assert_eq!(service.get_connections("source-1").await.len(), 1);
}

#[tokio::test]
async fn test_discover_agents() {
    let (service, plane) = service_with_plane().await;
    plane
        .seed_agent(record("target-1", "Support Agent", Some("https://t1.example.com/a2a")))
        .await;
    plane.seed_agent(record("no-a2a", "Plain Agent", None)).await;

    let agents = service.discover_agents().await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].agent_id, "target-1");
    assert_eq!(agents[0].a2a_url, "https://t1.example.com/a2a");
    assert_eq!(agents[0].capabilities, vec!["support".to_string()]);
}
