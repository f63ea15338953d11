// src/lib.rs
pub mod auth;
pub mod config;
pub mod error;
pub mod google_api;
pub mod manager;
pub mod mcp_server;
pub mod oauth;
pub mod schema;
pub mod service;
pub mod services;
pub mod transport;
pub mod utils;

use std::sync::Arc;

// Re-export types from rmcp that callers of the library need
pub use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeResult,
    ListToolsResult, ProtocolVersion, RawContent, ServerCapabilities, Tool,
};

pub use crate::auth::{AuthClient, GoogleAuthManager};
pub use crate::config::AuthConfig;
pub use crate::error::WorkspaceError;
pub use crate::google_api::{ApiRequest, GoogleApi, RestClient};
pub use crate::manager::ServiceManager;
pub use crate::schema::{Param, ParamType, ToolDescriptor};
pub use crate::service::{Command, CommandService, WorkspaceService};

/// Untyped tool arguments as they arrive over the wire.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// Register every compiled-in service against one API client.
#[allow(unused_variables)]
pub fn build_service_manager(api: Arc<dyn GoogleApi>) -> ServiceManager {
    #[allow(unused_mut)]
    let mut manager = ServiceManager::new();

    #[cfg(feature = "slides")]
    manager.register_service("slides", Arc::new(services::slides::service(api.clone())));
    #[cfg(feature = "sheets")]
    manager.register_service("sheets", Arc::new(services::sheets::service(api.clone())));
    #[cfg(feature = "drive")]
    manager.register_service("drive", Arc::new(services::drive::service(api.clone())));

    manager
}
