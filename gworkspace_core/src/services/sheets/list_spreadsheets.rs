use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use crate::error::WorkspaceError;
use crate::google_api::GoogleApi;
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::{drive_list_request, summary_lines, DriveFileList, SPREADSHEET_MIME};
use crate::utils::{page_size_arg, text_result};
use crate::ToolArgs;

pub struct ListSpreadsheets {
    api: Arc<dyn GoogleApi>,
}

impl ListSpreadsheets {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for ListSpreadsheets {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "sheets_list_spreadsheets",
            "Lists spreadsheets from Google Drive that the user has access to.",
            vec![Param::number("maxResults")
                .describe("Maximum number of spreadsheets to return. Defaults to 25.")
                .default_value(25)],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let page_size = page_size_arg(args, "maxResults", 25);
        let q = format!("mimeType='{}' and trashed=false", SPREADSHEET_MIME);
        let value = self
            .api
            .send(drive_list_request(
                &q,
                page_size,
                "files(id, name, modifiedTime, webViewLink)",
                "modifiedTime desc",
            ))
            .await
            .map_err(|e| e.context("Failed to list spreadsheets"))?;
        let list: DriveFileList = serde_json::from_value(value)?;

        if list.files.is_empty() {
            return Ok(text_result("No spreadsheets found."));
        }
        Ok(text_result(format!(
            "Found {} spreadsheets:\n\n{}",
            list.files.len(),
            summary_lines(&list.files)
        )))
    }
}
