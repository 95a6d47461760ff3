//! Gateway lifecycle management
//!
//! Creates the tool-hosting gateway for a conversation, exactly once; a
//! second attempt in the same session is blocked without touching the
//! control plane.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::domain::{
    name::{sanitize, ResourceKind},
    CreateGatewayRequest, FactoryError, FactoryResult, GatewayControlPort,
};

use super::session::SharedSession;

/// Protocol configuration every factory gateway is created with
const GATEWAY_PROTOCOL: &str = "MCP";
const GATEWAY_SUPPORTED_VERSIONS: &[&str] = &["2025-03-26"];
const GATEWAY_AUTHORIZER: &str = "AWS_IAM";

/// Result of a gateway creation attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GatewayOutcome {
    Created {
        gateway_id: String,
        gateway_name: String,
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        gateway_url: Option<String>,
    },
    /// One-shot guard tripped; informational, not a failure
    DuplicateBlocked {
        gateway_id: String,
        gateway_name: String,
    },
}

/// Session-scoped gateway lifecycle manager
pub struct GatewayService {
    port: Arc<dyn GatewayControlPort>,
    settings: Arc<Settings>,
    session: SharedSession,
}

impl GatewayService {
    pub fn new(
        port: Arc<dyn GatewayControlPort>,
        settings: Arc<Settings>,
        session: SharedSession,
    ) -> Self {
        Self {
            port,
            settings,
            session,
        }
    }

    /// Create a tool-hosting gateway.
    ///
    /// State machine: absent → created, with no further in-session
    /// transitions. Configuration problems are reported before any
    /// control-plane call.
    pub async fn create_gateway(
        &self,
        name: &str,
        description: &str,
    ) -> FactoryResult<GatewayOutcome> {
        let mut session = self.session.write().await;

        if session.gateway.created {
            warn!(
                existing = session.gateway.gateway_name.as_deref().unwrap_or(""),
                "duplicate gateway creation blocked"
            );
            return Ok(GatewayOutcome::DuplicateBlocked {
                gateway_id: session.gateway.gateway_id.clone().unwrap_or_default(),
                gateway_name: session.gateway.gateway_name.clone().unwrap_or_default(),
            });
        }

        let execution_role = self.settings.platform.execution_role_arn.trim();
        if execution_role.is_empty() {
            return Err(FactoryError::configuration(
                "execution role ARN not configured",
            ));
        }

        let safe_name = sanitize(name, ResourceKind::Gateway);
        info!(name = %safe_name, "creating gateway");

        let descriptor = self
            .port
            .create_gateway(CreateGatewayRequest {
                name: safe_name,
                description: description.to_string(),
                role_arn: execution_role.to_string(),
                protocol_type: GATEWAY_PROTOCOL.to_string(),
                supported_versions: GATEWAY_SUPPORTED_VERSIONS
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
                authorizer_type: GATEWAY_AUTHORIZER.to_string(),
            })
            .await
            .map_err(|e| FactoryError::deployment_from_message(e.to_string()))?;

        session.gateway.mark_created(descriptor.gateway_id.clone(), name);
        info!(gateway_id = %descriptor.gateway_id, "gateway created");

        Ok(GatewayOutcome::Created {
            gateway_id: descriptor.gateway_id,
            gateway_name: name.to_string(),
            description: description.to_string(),
            gateway_url: descriptor.gateway_url,
        })
    }
}
