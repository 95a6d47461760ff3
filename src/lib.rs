//! # Ergane - Agent Factory Control Plane
//!
//! Ergane lets a builder conversation provision AI agents as managed cloud
//! runtimes: it synthesizes backend code for tool specifications, packages
//! and registers the result behind a tool-hosting gateway, deploys agents
//! onto a pre-built generic runtime container, and maintains the directed
//! graph of live agent-to-agent (A2A) connections.
//!
//! ## Architecture
//!
//! Ergane follows Hexagonal Architecture:
//! - **Domain**: validated types, the name sanitizer, and the port traits
//!   for the external control plane and agent registry
//! - **Codegen**: pure text synthesis of executable tool backends
//! - **Services**: session-scoped builder operations (gateway lifecycle,
//!   tool registration, agent deployment, A2A connections)
//! - **Adapters**: control-plane implementations (in-memory and HTTP) and
//!   the REST boundary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ergane::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod domain;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::api_handler::{self, ApiState};

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(state: ApiState) -> Router {
    let api_router = Router::new()
        // Conversation lifecycle
        .route("/session/reset", post(api_handler::reset_session))
        // Gateway lifecycle + tool registration
        .route("/gateways", post(api_handler::create_gateway))
        .route(
            "/gateways/:gateway_id/tools",
            post(api_handler::register_tools),
        )
        // Agent deployment + discovery
        .route(
            "/agents",
            get(api_handler::list_agents).post(api_handler::deploy_agent),
        )
        .route("/agents/discover", get(api_handler::discover_agents))
        .route(
            "/agents/:agent_id/connections",
            get(api_handler::get_connections),
        )
        // A2A connections
        .route("/connections", post(api_handler::add_connection))
        .with_state(state);

    let router = Router::new()
        .route("/health", get(api_handler::health))
        .nest("/api", api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
