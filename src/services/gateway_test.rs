use std::sync::Arc;

use crate::adapters::in_memory::InMemoryControlPlane;
use crate::config::{ControlPlaneSettings, PlatformSettings, ServerSettings, Settings};
use crate::domain::{DeploymentErrorKind, FactoryError};
use crate::services::gateway::{GatewayOutcome, GatewayService};
use crate::services::session::new_shared_session;

fn test_settings(execution_role: &str) -> Arc<Settings> {
    Arc::new(Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        platform: PlatformSettings {
            execution_role_arn: execution_role.to_string(),
            container_repository: "000000000000.dkr.ecr.us-west-2.amazonaws.com/agents".to_string(),
            ..PlatformSettings::default()
        },
        control_plane: ControlPlaneSettings::default(),
    })
}

#[tokio::test]
async fn test_create_gateway_once() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = GatewayService::new(
        plane.clone(),
        test_settings("arn:aws:iam::123456789012:role/FactoryRole"),
        new_shared_session(),
    );

    let outcome = service
        .create_gateway("Order Gateway", "Order management tools")
        .await
        .unwrap();
    let first_id = match outcome {
        GatewayOutcome::Created {
            gateway_id,
            gateway_name,
            gateway_url,
            ..
        } => {
            assert_eq!(gateway_name, "Order Gateway");
            assert_eq!(gateway_url, plane.gateway_url(&gateway_id).await);
            gateway_id
        }
        other => panic!("expected Created, got {:?}", other),
    };
    assert_eq!(plane.gateway_count().await, 1);

    // Second attempt is blocked without another control-plane call
    let outcome = service
        .create_gateway("Other Gateway", "Something else")
        .await
        .unwrap();
    match outcome {
        GatewayOutcome::DuplicateBlocked {
            gateway_id,
            gateway_name,
        } => {
            assert_eq!(gateway_id, first_id);
            assert_eq!(gateway_name, "Order Gateway");
        }
        other => panic!("expected DuplicateBlocked, got {:?}", other),
    }
    assert_eq!(plane.gateway_count().await, 1);
}

#[tokio::test]
async fn test_missing_execution_role_fails_before_control_plane() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = GatewayService::new(plane.clone(), test_settings(""), new_shared_session());

    let err = service
        .create_gateway("Order Gateway", "desc")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FactoryError::Deployment {
            kind: DeploymentErrorKind::ConfigurationMissing,
            ..
        }
    ));
    assert_eq!(plane.gateway_count().await, 0);
}

#[tokio::test]
async fn test_gateway_name_sanitized() {
    let plane = Arc::new(InMemoryControlPlane::new("us-west-2"));
    let service = GatewayService::new(
        plane.clone(),
        test_settings("arn:aws:iam::123456789012:role/FactoryRole"),
        new_shared_session(),
    );

    // A name full of punctuation still produces a gateway
    let outcome = service
        .create_gateway("Order!! Gateway??", "desc")
        .await
        .unwrap();
    assert!(matches!(outcome, GatewayOutcome::Created { .. }));
}
