use config::{Config, File};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::cli::Cli;

/// Application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub platform: PlatformSettings,
    #[serde(default)]
    pub control_plane: ControlPlaneSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Settings describing the managed platform agents are deployed into
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformSettings {
    /// Cloud region for all provisioned resources
    #[serde(default = "default_region")]
    pub region: String,
    /// Execution role assumed by gateways and runtimes
    #[serde(default)]
    pub execution_role_arn: String,
    /// Execution role for tool functions; falls back to the main role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda_execution_role_arn: Option<String>,
    /// Model id injected into deployed agents
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Container repository holding the pre-built generic agent image
    #[serde(default)]
    pub container_repository: String,
    /// Memory store id passed through to deployed agents
    #[serde(default)]
    pub memory_id: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            execution_role_arn: String::new(),
            lambda_execution_role_arn: None,
            model_id: default_model_id(),
            container_repository: String::new(),
            memory_id: String::new(),
        }
    }
}

fn default_region() -> String {
    "us-west-2".to_string()
}

fn default_model_id() -> String {
    "us.anthropic.claude-haiku-4-5-20251001-v1:0".to_string()
}

/// How to reach the control plane
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ControlPlaneSettings {
    #[serde(default)]
    pub mode: ControlPlaneMode,
    /// Base URL of the remote control plane (http mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bearer token for the remote control plane (http mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPlaneMode {
    /// Simulated in-process control plane (demo and tests)
    #[default]
    Memory,
    /// Remote control plane over HTTPS
    Http,
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_file("ergane.toml")
    }

    fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        settings.validated()
    }

    /// Create settings from CLI arguments (config file plus CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.apply_cli_overrides(cli);
        settings.validated()
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", messages.join("\n"))
        })?;
        Ok(self)
    }

    /// Apply CLI argument overrides (CLI > env vars > config file)
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(region) = &cli.region {
            self.platform.region = region.clone();
        }
        if let Some(role) = &cli.execution_role {
            self.platform.execution_role_arn = role.clone();
        }
        if let Some(model_id) = &cli.model_id {
            self.platform.model_id = model_id.clone();
        }
        if let Some(base_url) = &cli.control_plane_url {
            self.control_plane.mode = ControlPlaneMode::Http;
            self.control_plane.base_url = Some(base_url.clone());
        }
    }
}
