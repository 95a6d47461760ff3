use clap::Parser;
use ergane::adapters::api_handler::ApiState;
use ergane::adapters::http::HttpControlPlane;
use ergane::adapters::in_memory::InMemoryControlPlane;
use ergane::cli::Cli;
use ergane::config::{ControlPlaneMode, Settings};
use ergane::domain::{
    AgentRegistryPort, FunctionControlPort, GatewayControlPort, RuntimeControlPort,
};
use ergane::services::a2a::A2aConnectionService;
use ergane::services::deployment::DeploymentService;
use ergane::services::gateway::GatewayService;
use ergane::services::session::new_shared_session;
use ergane::services::tools::ToolService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let cli = Cli::parse();
    let settings = Arc::new(Settings::new_with_cli(&cli)?);
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Ergane agent factory on {}:{}", host, port);

    // Wire the control-plane ports per configured mode
    let (gateways, functions, runtimes, registry): (
        Arc<dyn GatewayControlPort>,
        Arc<dyn FunctionControlPort>,
        Arc<dyn RuntimeControlPort>,
        Arc<dyn AgentRegistryPort>,
    ) = match settings.control_plane.mode {
        ControlPlaneMode::Memory => {
            info!("Using in-memory control plane (demo mode)");
            let plane = Arc::new(InMemoryControlPlane::new(settings.platform.region.clone()));
            (plane.clone(), plane.clone(), plane.clone(), plane)
        }
        ControlPlaneMode::Http => {
            let base_url = settings
                .control_plane
                .base_url
                .clone()
                .unwrap_or_default();
            info!("Using remote control plane at {}", base_url);
            let plane = Arc::new(HttpControlPlane::new(
                base_url,
                settings.control_plane.api_token.clone(),
            ));
            (plane.clone(), plane.clone(), plane.clone(), plane)
        }
    };

    // One session per process invocation; the reset endpoint bounds it to
    // one conversation
    let session = new_shared_session();

    let state = ApiState {
        session: session.clone(),
        gateway: Arc::new(GatewayService::new(
            gateways.clone(),
            settings.clone(),
            session.clone(),
        )),
        tools: Arc::new(ToolService::new(
            functions.clone(),
            gateways,
            settings.clone(),
        )),
        deployment: Arc::new(DeploymentService::new(
            runtimes.clone(),
            settings.clone(),
            session,
        )),
        a2a: Arc::new(A2aConnectionService::new(registry, runtimes)),
    };

    let app = ergane::create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
