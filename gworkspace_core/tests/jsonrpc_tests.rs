use async_trait::async_trait;
use gworkspace_core::google_api::RecordingApi;
use gworkspace_core::mcp_server::{JsonRpcHandler, McpServer};
use gworkspace_core::utils::text_result;
use gworkspace_core::{
    build_service_manager, CallToolResult, Command, CommandService, Param, ServiceManager,
    ToolDescriptor, WorkspaceError,
};
use serde_json::{json, Value};
use std::sync::Arc;

struct Echo;

#[async_trait]
impl Command for Echo {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "echo",
            "Echo the message back",
            vec![
                Param::string("message").required(),
                Param::boolean("shout").default_value(false),
            ],
        )
    }

    async fn execute(
        &self,
        args: &serde_json::Map<String, Value>,
    ) -> Result<CallToolResult, WorkspaceError> {
        let message = args
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| WorkspaceError::InvalidParams("message is required".into()))?;
        let shout = args.get("shout").and_then(Value::as_bool).unwrap_or(true);
        Ok(text_result(if shout {
            message.to_uppercase()
        } else {
            message.to_string()
        }))
    }
}

fn echo_handler() -> JsonRpcHandler {
    let mut manager = ServiceManager::new();
    manager.register_service("test", Arc::new(CommandService::new("test", vec![Box::new(Echo)])));
    JsonRpcHandler::new(Arc::new(McpServer::new(Arc::new(manager))))
}

async fn call(handler: &JsonRpcHandler, request: Value) -> Value {
    handler
        .handle_request(request)
        .await
        .expect("requests with an id get a response")
}

#[tokio::test]
async fn echo_end_to_end() {
    let handler = echo_handler();

    let init = call(
        &handler,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
            "protocolVersion": "2025-06-18",
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "0"}
        }}),
    )
    .await;
    assert_eq!(init["result"]["serverInfo"]["name"], "google-workspace-mcp");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    let list = call(&handler, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "echo");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["message"]));

    let reply = call(
        &handler,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "echo", "arguments": {"message": "hello"}}}),
    )
    .await;
    assert_eq!(reply["id"], 3);
    assert_eq!(reply["result"]["content"][0]["type"], "text");
    // default `shout: false` was filled in before dispatch
    assert_eq!(reply["result"]["content"][0]["text"], "hello");
    assert_eq!(reply["result"]["isError"], false);
}

#[tokio::test]
async fn wrong_argument_type_is_invalid_params() {
    let handler = echo_handler();
    let reply = call(
        &handler,
        json!({"jsonrpc": "2.0", "id": "a", "method": "tools/call",
               "params": {"name": "echo", "arguments": {"message": 42}}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32602);
    assert_eq!(reply["id"], "a");
}

#[tokio::test]
async fn missing_required_argument_is_a_tool_failure() {
    let handler = echo_handler();
    let reply = call(
        &handler,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "echo", "arguments": {}}}),
    )
    .await;
    assert_eq!(reply["result"]["isError"], true);
    assert_eq!(
        reply["result"]["content"][0]["text"],
        "Error: Invalid params: message is required"
    );
}

#[tokio::test]
async fn unknown_tool_and_method() {
    let handler = echo_handler();

    let reply = call(
        &handler,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
               "params": {"name": "missing", "arguments": {}}}),
    )
    .await;
    assert_eq!(reply["result"]["isError"], true);
    assert_eq!(
        reply["result"]["content"][0]["text"],
        "Error: No service found to handle tool 'missing'"
    );

    let reply = call(&handler, json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"})).await;
    assert_eq!(reply["error"]["code"], -32601);

    let reply = call(&handler, json!({"jsonrpc": "2.0", "id": 7, "method": "ping"})).await;
    assert_eq!(reply["result"], json!({}));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let handler = echo_handler();
    let reply = handler
        .handle_request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;
    assert!(reply.is_none());
}

#[tokio::test]
async fn workspace_tools_are_listed_with_defaults() {
    let manager = build_service_manager(Arc::new(RecordingApi::new()));
    let handler = JsonRpcHandler::new(Arc::new(McpServer::new(Arc::new(manager))));
    let list = call(&handler, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;
    let tools = list["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "slides_create_presentation",
            "slides_get_presentation",
            "slides_list_presentations",
            "slides_get_page",
            "sheets_list_spreadsheets",
            "sheets_get_spreadsheet_info",
            "sheets_read_sheet_values",
            "drive_search_files",
            "drive_list_items",
        ]
    );
    let list_items = &tools[8];
    assert_eq!(list_items["inputSchema"]["properties"]["folderId"]["default"], "root");
    assert_eq!(list_items["inputSchema"]["properties"]["maxResults"]["default"], 100);
}
