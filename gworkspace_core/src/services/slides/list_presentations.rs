use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use crate::error::WorkspaceError;
use crate::google_api::GoogleApi;
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::{drive_list_request, summary_lines, DriveFileList, PRESENTATION_MIME};
use crate::utils::{page_size_arg, text_result};
use crate::ToolArgs;

pub struct ListPresentations {
    api: Arc<dyn GoogleApi>,
}

impl ListPresentations {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for ListPresentations {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "slides_list_presentations",
            "Lists presentations from Google Drive that the user has access to.",
            vec![Param::number("maxResults")
                .describe("Maximum number of presentations to return. Defaults to 25.")
                .default_value(25)],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let page_size = page_size_arg(args, "maxResults", 25);
        let q = format!("mimeType='{}' and trashed=false", PRESENTATION_MIME);
        let request = drive_list_request(
            &q,
            page_size,
            "files(id, name, modifiedTime, webViewLink)",
            "modifiedTime desc",
        );

        let value = self
            .api
            .send(request)
            .await
            .map_err(|e| e.context("Failed to list presentations"))?;
        let list: DriveFileList = serde_json::from_value(value)?;

        if list.files.is_empty() {
            return Ok(text_result("No presentations found."));
        }
        Ok(text_result(format!(
            "Found {} presentations:\n\n{}",
            list.files.len(),
            summary_lines(&list.files)
        )))
    }
}
