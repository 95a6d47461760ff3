use clap::Parser;
use std::path::PathBuf;

/// Agent factory control plane - provisions agents, tool backends, and A2A links
#[derive(Parser, Debug, Clone)]
#[command(name = "ergane", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ERGANE_CONFIG", default_value = "ergane.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "ERGANE_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "ERGANE_PORT")]
    pub port: Option<u16>,

    /// Cloud region for provisioned resources
    #[arg(long, env = "ERGANE_REGION")]
    pub region: Option<String>,

    /// Execution role ARN for gateways and runtimes
    #[arg(long, env = "ERGANE_EXECUTION_ROLE_ARN")]
    pub execution_role: Option<String>,

    /// Model id injected into deployed agents
    #[arg(long, env = "ERGANE_MODEL_ID")]
    pub model_id: Option<String>,

    /// Base URL of a remote control plane (switches off the in-memory one)
    #[arg(long, env = "ERGANE_CONTROL_PLANE_URL")]
    pub control_plane_url: Option<String>,
}
