use std::{net::SocketAddr, sync::Arc};

use ticket_mcp_server::{
    build_app,
    config::Config,
    domain::{tickets::seed_tickets, tools::ToolRegistry},
    logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let bind_socket = config.bind_socket()?;

    let registry = Arc::new(ToolRegistry::with_ticket_tools(seed_tickets()));
    let app = build_app(AppState::new(registry));
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
