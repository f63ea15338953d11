use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gworkspace_core::{
    build_service_manager,
    mcp_server::{JsonRpcHandler, McpServer},
    transport::StdioTransport,
    AuthConfig, GoogleAuthManager, RestClient, WorkspaceError,
};

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gworkspace_mcp=info,gworkspace_core=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Starting Google Workspace MCP Server");

    let handler = match startup().await {
        Ok(handler) => handler,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = StdioTransport::new(handler);
    info!("MCP Server ready, listening on stdio");

    if let Err(e) = transport.run().await {
        error!("Transport error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn startup() -> Result<JsonRpcHandler, WorkspaceError> {
    let config = AuthConfig::from_env();
    info!(
        "Using credentials {} and token {}",
        config.credentials_path.display(),
        config.token_path.display()
    );

    let auth = GoogleAuthManager::new(config).get_client().await?;
    let manager = build_service_manager(Arc::new(RestClient::new(auth)));
    info!("{} tools registered", manager.tools().len());

    let server = McpServer::new(Arc::new(manager));
    Ok(JsonRpcHandler::new(Arc::new(server)))
}
