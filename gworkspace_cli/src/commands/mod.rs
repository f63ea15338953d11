pub mod call;
pub mod check;
pub mod setup;
pub mod tools;

use std::sync::Arc;

use gworkspace_core::{
    build_service_manager, AuthConfig, GoogleAuthManager, RestClient, ServiceManager,
    WorkspaceError,
};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Tool '{0}' reported an error")]
    ToolFailed(String),

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error(transparent)]
    Core(#[from] WorkspaceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub fn auth_config(cli: &Cli) -> AuthConfig {
    AuthConfig::new(&cli.credentials, &cli.token)
}

/// The same registry the MCP server builds, backed by the stored token.
pub async fn authenticated_manager(cli: &Cli) -> Result<ServiceManager> {
    let auth = GoogleAuthManager::new(auth_config(cli));
    let client = auth.get_client().await?;
    Ok(build_service_manager(Arc::new(RestClient::new(client))))
}
