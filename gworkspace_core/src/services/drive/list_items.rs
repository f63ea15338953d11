use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use super::FILE_FIELDS;
use crate::error::WorkspaceError;
use crate::google_api::GoogleApi;
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::{drive_list_request, DriveFile, DriveFileList, FOLDER_MIME, UNKNOWN, UNNAMED};
use crate::utils::{escape_query_literal, format_kb, page_size_arg, string_arg_or, text_result};
use crate::ToolArgs;

pub struct ListItems {
    api: Arc<dyn GoogleApi>,
}

impl ListItems {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for ListItems {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "drive_list_items",
            "List files and folders within a specific Drive folder.",
            vec![
                Param::string("folderId")
                    .describe("The ID of the folder to list items from. Use \"root\" for the root folder.")
                    .default_value("root"),
                Param::number("maxResults")
                    .describe("Maximum number of items to return. Defaults to 100.")
                    .default_value(100),
            ],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let folder_id = string_arg_or(args, "folderId", "root");
        let page_size = page_size_arg(args, "maxResults", 100);

        let q = format!(
            "'{}' in parents and trashed=false",
            escape_query_literal(folder_id)
        );
        let value = self
            .api
            .send(drive_list_request(&q, page_size, FILE_FIELDS, "name"))
            .await
            .map_err(|e| e.context("Failed to list folder contents"))?;
        let list: DriveFileList = serde_json::from_value(value)?;

        if list.files.is_empty() {
            return Ok(text_result(format!(
                "No files or folders found in folder ID \"{}\".",
                folder_id
            )));
        }
        Ok(text_result(render(folder_id, &list.files)))
    }
}

fn render(folder_id: &str, files: &[DriveFile]) -> String {
    let (folders, regular): (Vec<&DriveFile>, Vec<&DriveFile>) = files
        .iter()
        .partition(|f| f.mime_type.as_deref() == Some(FOLDER_MIME));

    let mut out = format!("{} items in folder ID \"{}\":\n\n", files.len(), folder_id);
    if !folders.is_empty() {
        out.push_str(&format!("Folders ({}):\n", folders.len()));
        for f in &folders {
            out.push_str(&format!(
                "  - {} (ID: {})\n",
                f.name.as_deref().unwrap_or(UNNAMED),
                f.id.as_deref().unwrap_or(UNKNOWN)
            ));
        }
        out.push('\n');
    }
    if !regular.is_empty() {
        out.push_str(&format!("Files ({}):\n", regular.len()));
        for f in &regular {
            out.push_str(&format!("  - {}\n", f.name.as_deref().unwrap_or(UNNAMED)));
            out.push_str(&format!("    ID: {}\n", f.id.as_deref().unwrap_or(UNKNOWN)));
            out.push_str(&format!(
                "    Type: {}\n",
                f.mime_type.as_deref().unwrap_or(UNKNOWN)
            ));
            out.push_str(&format!(
                "    Modified: {}\n",
                f.modified_time.as_deref().unwrap_or(UNKNOWN)
            ));
            out.push_str(&format!("    Size: {}\n", format_kb(f.size.as_deref())));
            out.push_str(&format!(
                "    Link: {}\n\n",
                f.web_view_link.as_deref().unwrap_or("none")
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google_api::RecordingApi;
    use crate::utils::result_text;
    use serde_json::json;

    #[tokio::test]
    async fn folders_come_before_files() {
        let api = Arc::new(RecordingApi::new().respond(json!({"files": [
            {"id": "f1", "name": "a.pdf", "mimeType": "application/pdf", "size": "4096"},
            {"id": "d1", "name": "Archive", "mimeType": FOLDER_MIME}
        ]})));
        let cmd = ListItems::new(api.clone());

        let text = result_text(&cmd.execute(&ToolArgs::new()).await.unwrap());
        let folders_at = text.find("Folders (1):").unwrap();
        let files_at = text.find("Files (1):").unwrap();
        assert!(folders_at < files_at);
        assert!(text.contains("  - Archive (ID: d1)"));
        assert!(text.contains("    Size: 4 KB"));

        let req = &api.requests()[0];
        assert_eq!(req.query_value("q"), Some("'root' in parents and trashed=false"));
        assert_eq!(req.query_value("pageSize"), Some("100"));
        assert_eq!(req.query_value("orderBy"), Some("name"));
        assert_eq!(req.query_value("supportsAllDrives"), Some("true"));
    }

    #[tokio::test]
    async fn folder_id_is_quoted_safely() {
        let api = Arc::new(RecordingApi::new().respond(json!({"files": []})));
        let cmd = ListItems::new(api.clone());
        let mut args = ToolArgs::new();
        args.insert("folderId".into(), json!("it's"));

        let text = result_text(&cmd.execute(&args).await.unwrap());
        assert_eq!(text, "No files or folders found in folder ID \"it's\".");
        assert_eq!(
            api.requests()[0].query_value("q"),
            Some("'it\\'s' in parents and trashed=false")
        );
    }
}
