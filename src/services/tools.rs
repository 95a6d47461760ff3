//! Tool packaging and gateway registration
//!
//! Synthesizes backend code for each tool spec, packages it, creates or
//! updates the backing function, registers it as a gateway target, and
//! grants the gateway invoke permission. Batch registration isolates
//! per-tool failures: one bad spec never aborts its siblings.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::codegen::{CodeSynthesizer, PACKAGE_HANDLER, PACKAGE_RUNTIME};
use crate::config::Settings;
use crate::domain::{
    name::{sanitize, ResourceKind},
    CreateFunctionRequest, FactoryError, FactoryResult, FunctionControlPort, GatewayControlPort,
    GatewayTargetRequest, InvokePermissionRequest, ToolSpec,
};

const FUNCTION_TIMEOUT_SECONDS: u32 = 30;
const FUNCTION_MEMORY_MB: u32 = 512;

/// Result of packaging a single tool into a backend function
#[derive(Debug, Clone, Serialize)]
pub struct CreatedFunction {
    pub function_arn: String,
    pub function_name: String,
    pub tool_name: String,
    pub tool_description: String,
    pub input_schema: Value,
}

/// A tool successfully registered behind a gateway
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTool {
    pub name: String,
    pub function_arn: String,
    pub description: String,
}

/// A tool that failed registration, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct FailedTool {
    pub name: String,
    pub error: String,
}

/// Distinguishable batch outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    AllSucceeded,
    PartialFailure,
    AllFailed,
}

/// Per-item report for a batch registration
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReport {
    pub gateway_id: String,
    pub created: Vec<CreatedTool>,
    pub failed: Vec<FailedTool>,
}

impl RegistrationReport {
    pub fn outcome(&self) -> BatchOutcome {
        if self.failed.is_empty() && !self.created.is_empty() {
            BatchOutcome::AllSucceeded
        } else if self.created.is_empty() {
            BatchOutcome::AllFailed
        } else {
            BatchOutcome::PartialFailure
        }
    }
}

/// Session-scoped tool packaging and registration service
pub struct ToolService {
    functions: Arc<dyn FunctionControlPort>,
    gateways: Arc<dyn GatewayControlPort>,
    settings: Arc<Settings>,
    synthesizer: CodeSynthesizer,
}

impl ToolService {
    pub fn new(
        functions: Arc<dyn FunctionControlPort>,
        gateways: Arc<dyn GatewayControlPort>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            functions,
            gateways,
            settings,
            synthesizer: CodeSynthesizer::new(),
        }
    }

    /// Synthesize, package, and deploy one tool's backend function.
    ///
    /// An existing function of the same name gets its code updated in
    /// place; otherwise a fresh function is created with the fixed runtime
    /// profile and the tool name/description exposed as configuration.
    pub async fn create_tool_function(
        &self,
        spec: &ToolSpec,
        execution_role: &str,
        function_prefix: &str,
    ) -> FactoryResult<CreatedFunction> {
        let safe_name = sanitize(&spec.name, ResourceKind::Generic);
        let function_name = format!("{}-{}", function_prefix, safe_name);

        info!(function = %function_name, tool = %spec.name, "packaging tool function");

        let unit = self.synthesizer.synthesize(spec);
        let package = unit.package()?;

        let exists = self
            .functions
            .function_exists(&function_name)
            .await
            .map_err(packaging_error)?;

        let descriptor = if exists {
            let descriptor = self
                .functions
                .update_function_code(&function_name, package)
                .await
                .map_err(packaging_error)?;
            info!(function = %function_name, "updated existing tool function");
            descriptor
        } else {
            let mut environment = HashMap::new();
            environment.insert("TOOL_NAME".to_string(), spec.name.clone());
            environment.insert("TOOL_DESCRIPTION".to_string(), spec.description.clone());

            let descriptor = self
                .functions
                .create_function(CreateFunctionRequest {
                    function_name: function_name.clone(),
                    description: spec.description.clone(),
                    role_arn: execution_role.to_string(),
                    runtime: PACKAGE_RUNTIME.to_string(),
                    handler: PACKAGE_HANDLER.to_string(),
                    package,
                    timeout_seconds: FUNCTION_TIMEOUT_SECONDS,
                    memory_mb: FUNCTION_MEMORY_MB,
                    environment,
                })
                .await
                .map_err(packaging_error)?;
            info!(function = %function_name, "created new tool function");
            descriptor
        };

        Ok(CreatedFunction {
            function_arn: descriptor.function_arn,
            function_name: descriptor.function_name,
            tool_name: spec.name.clone(),
            tool_description: spec.description.clone(),
            input_schema: spec.input_schema.clone(),
        })
    }

    /// Register a batch of tools behind a gateway.
    ///
    /// Each spec runs the full pipeline independently (validate, package,
    /// register as a gateway target, grant invoke permission) and lands in
    /// either the created or the failed list. A permission grant that
    /// already exists counts as success.
    pub async fn register_tools(
        &self,
        gateway_id: &str,
        specs: &[ToolSpec],
    ) -> FactoryResult<RegistrationReport> {
        let execution_role = self.resolve_execution_role()?;
        let function_prefix = format!("gateway-{}", gateway_id);

        let mut created = Vec::new();
        let mut failed = Vec::new();

        for spec in specs {
            match self
                .register_one(gateway_id, spec, &execution_role, &function_prefix)
                .await
            {
                Ok(tool) => {
                    info!(tool = %tool.name, "tool registered");
                    created.push(tool);
                }
                Err(e) => {
                    warn!(tool = %spec.name, error = %e, "tool registration failed");
                    failed.push(FailedTool {
                        name: spec.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(RegistrationReport {
            gateway_id: gateway_id.to_string(),
            created,
            failed,
        })
    }

    async fn register_one(
        &self,
        gateway_id: &str,
        spec: &ToolSpec,
        execution_role: &str,
        function_prefix: &str,
    ) -> FactoryResult<CreatedTool> {
        spec.validate()?;

        let function = self
            .create_tool_function(spec, execution_role, function_prefix)
            .await?;

        let target_name = sanitize(&spec.name, ResourceKind::GatewayTarget);
        self.gateways
            .create_gateway_target(GatewayTargetRequest {
                gateway_id: gateway_id.to_string(),
                name: target_name,
                description: spec.description.clone(),
                function_arn: function.function_arn.clone(),
                tool_name: spec.name.clone(),
                tool_description: spec.description.clone(),
                input_schema: spec.input_schema.clone(),
            })
            .await
            .map_err(packaging_error)?;

        // Idempotent: an existing grant is success, anything else is logged
        // and the registration still counts
        match self
            .functions
            .add_invoke_permission(InvokePermissionRequest {
                function_name: function.function_name.clone(),
                statement_id: format!("AllowGatewayInvoke-{}", gateway_id),
                gateway_id: gateway_id.to_string(),
            })
            .await
        {
            Ok(()) => info!(function = %function.function_name, "invoke permission granted"),
            Err(crate::domain::ControlPlaneError::Conflict(_)) => {
                info!(function = %function.function_name, "invoke permission already exists")
            }
            Err(e) => {
                warn!(function = %function.function_name, error = %e, "failed to add invoke permission")
            }
        }

        Ok(CreatedTool {
            name: spec.name.clone(),
            function_arn: function.function_arn,
            description: spec.description.clone(),
        })
    }

    fn resolve_execution_role(&self) -> FactoryResult<String> {
        let platform = &self.settings.platform;
        let role = platform
            .lambda_execution_role_arn
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(platform.execution_role_arn.as_str());
        if role.trim().is_empty() {
            return Err(FactoryError::configuration(
                "function execution role not configured",
            ));
        }
        Ok(role.to_string())
    }
}

fn packaging_error(e: crate::domain::ControlPlaneError) -> FactoryError {
    FactoryError::Packaging(e.to_string())
}
