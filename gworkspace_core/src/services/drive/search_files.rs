use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use super::FILE_FIELDS;
use crate::error::WorkspaceError;
use crate::google_api::GoogleApi;
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::{drive_list_request, DriveFileList, UNKNOWN, UNNAMED};
use crate::utils::{escape_query_literal, format_kb, page_size_arg, required_string, text_result};
use crate::ToolArgs;

pub struct SearchFiles {
    api: Arc<dyn GoogleApi>,
}

impl SearchFiles {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

/// Anything mentioning `mimeType` or containing a quote is passed through as
/// Drive query syntax; everything else becomes a name search.
pub fn build_search_query(query: &str) -> String {
    if query.contains("mimeType") || query.contains('\'') {
        format!("({}) and trashed=false", query)
    } else {
        format!(
            "name contains '{}' and trashed=false",
            escape_query_literal(query)
        )
    }
}

#[async_trait]
impl Command for SearchFiles {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "drive_search_files",
            "Search for files in Google Drive using query syntax or free text. Supports filtering by name, type, and other criteria.",
            vec![
                Param::string("query")
                    .describe("Search query. Can be free text (e.g., \"report\") or Drive query syntax (e.g., \"name contains 'report' and mimeType='application/pdf'\").")
                    .required(),
                Param::number("maxResults")
                    .describe("Maximum number of files to return. Defaults to 20.")
                    .default_value(20),
            ],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let query = required_string(args, "query")?;
        let page_size = page_size_arg(args, "maxResults", 20);

        let request = drive_list_request(
            &build_search_query(query),
            page_size,
            FILE_FIELDS,
            "modifiedTime desc",
        );
        let value = self
            .api
            .send(request)
            .await
            .map_err(|e| e.context("Failed to search files"))?;
        let list: DriveFileList = serde_json::from_value(value)?;

        if list.files.is_empty() {
            return Ok(text_result(format!(
                "No files found matching query \"{}\".",
                query
            )));
        }

        let mut out = format!(
            "Found {} files matching query \"{}\":\n\n",
            list.files.len(),
            query
        );
        for file in &list.files {
            out.push_str(&format!("- {}\n", file.name.as_deref().unwrap_or(UNNAMED)));
            out.push_str(&format!("  ID: {}\n", file.id.as_deref().unwrap_or(UNKNOWN)));
            out.push_str(&format!(
                "  Type: {}\n",
                file.mime_type.as_deref().unwrap_or(UNKNOWN)
            ));
            out.push_str(&format!(
                "  Modified: {}\n",
                file.modified_time.as_deref().unwrap_or(UNKNOWN)
            ));
            out.push_str(&format!("  Size: {}\n", format_kb(file.size.as_deref())));
            out.push_str(&format!(
                "  Link: {}\n\n",
                file.web_view_link.as_deref().unwrap_or("none")
            ));
        }
        Ok(text_result(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_becomes_name_search() {
        assert_eq!(
            build_search_query("report"),
            "name contains 'report' and trashed=false"
        );
    }

    #[test]
    fn drive_syntax_is_wrapped() {
        assert_eq!(
            build_search_query("mimeType='application/pdf'"),
            "(mimeType='application/pdf') and trashed=false"
        );
        assert_eq!(
            build_search_query("name = 'x'"),
            "(name = 'x') and trashed=false"
        );
    }
}
