use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::WorkspaceError;
use crate::manager::ServiceManager;
use rmcp::model::*;

pub const SERVER_NAME: &str = "google-workspace-mcp";

const INSTRUCTIONS: &str = "Google Workspace tools: create and read Google Slides presentations, inspect and read Google Sheets, and search or browse Google Drive. Tool names are prefixed with the service they belong to (slides_, sheets_, drive_).";

/// MCP server that publishes the tools of a [`ServiceManager`].
pub struct McpServer {
    manager: Arc<ServiceManager>,
}

impl McpServer {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self { manager }
    }

    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: Some(Default::default()),
            ..Default::default()
        }
    }

    pub fn handle_initialize(&self) -> InitializeResult {
        info!("MCP Server initializing");
        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: self.capabilities(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    pub fn handle_list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.manager.tools().iter().map(|d| d.to_tool()).collect(),
            next_cursor: None,
        }
    }

    /// Check the arguments against the tool's declared parameters, then dispatch.
    /// Unknown tools are not rejected here; the registry answers them in-band.
    pub async fn handle_call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, WorkspaceError> {
        let name = request.name.to_string();
        let args = request.arguments.unwrap_or_default();
        let args = match self.manager.descriptor(&name) {
            Some(descriptor) => descriptor.schema.apply(&args)?,
            None => args,
        };
        Ok(self.manager.handle_tool_call(&name, args).await)
    }
}

/// JSON-RPC 2.0 framing around [`McpServer`].
pub struct JsonRpcHandler {
    server: Arc<McpServer>,
}

impl JsonRpcHandler {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self { server }
    }

    /// Handle one decoded message. Notifications (no `id`) produce `None`.
    pub async fn handle_request(&self, request: Value) -> Option<Value> {
        debug!("Handling JSON-RPC request: {}", request);

        let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
        let Some(id) = request.get("id").cloned() else {
            debug!("Notification received: {}", method);
            return None;
        };
        if method.is_empty() {
            return Some(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32600, "message": "Invalid Request"},
                "id": id,
            }));
        }
        let params = request.get("params").cloned().unwrap_or(json!({}));

        let result = match method {
            "initialize" => to_value(self.server.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(self.server.handle_list_tools()),
            "tools/call" => match serde_json::from_value::<CallToolRequestParam>(params) {
                Ok(req) => match self.server.handle_call_tool(req).await {
                    Ok(r) => to_value(r),
                    Err(e) => Err(e.to_jsonrpc_error()),
                },
                Err(e) => Err(WorkspaceError::SerdeJson(e).to_jsonrpc_error()),
            },
            _ => Err(WorkspaceError::MethodNotFound.to_jsonrpc_error()),
        };

        Some(match result {
            Ok(result) => json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": id,
            }),
            Err(error) => json!({
                "jsonrpc": "2.0",
                "error": error,
                "id": id,
            }),
        })
    }
}

fn to_value<T: serde::Serialize>(v: T) -> Result<Value, Value> {
    serde_json::to_value(v).map_err(|e| WorkspaceError::SerdeJson(e).to_jsonrpc_error())
}
