use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::Arc;

use super::spreadsheet_url;
use super::types::ValueRange;
use crate::error::WorkspaceError;
use crate::google_api::{ApiRequest, GoogleApi};
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::utils::{required_string, string_arg_or, text_result};
use crate::ToolArgs;

pub const DEFAULT_RANGE: &str = "A1:Z1000";

pub struct ReadSheetValues {
    api: Arc<dyn GoogleApi>,
}

impl ReadSheetValues {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for ReadSheetValues {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "sheets_read_sheet_values",
            "Reads values from a specific range in a Google Sheet.",
            vec![
                Param::string("spreadsheetId")
                    .describe("The ID of the spreadsheet.")
                    .required(),
                Param::string("range")
                    .describe(
                        "The range to read (e.g., \"Sheet1!A1:D10\", \"A1:D10\"). Defaults to \"A1:Z1000\".",
                    )
                    .default_value(DEFAULT_RANGE),
            ],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let spreadsheet_id = required_string(args, "spreadsheetId")?;
        let range = string_arg_or(args, "range", DEFAULT_RANGE);

        let url = format!(
            "{}/values/{}",
            spreadsheet_url(spreadsheet_id),
            urlencoding::encode(range)
        );
        let value = self
            .api
            .send(ApiRequest::get(url))
            .await
            .map_err(|e| e.context("Failed to read sheet values"))?;
        let values: ValueRange = serde_json::from_value(value)?;

        if values.values.is_empty() {
            return Ok(text_result("No data found in the specified range."));
        }
        Ok(text_result(render(range, &values.values)))
    }
}

/// Rows padded to the widest row; only strings and numbers are shown.
fn render(range: &str, rows: &[Value]) -> String {
    let width = rows
        .iter()
        .map(|r| r.as_array().map_or(0, Vec::len))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "Read {} rows from range \"{}\":\n\n",
        rows.len(),
        range
    );
    for (i, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_array() else {
            continue;
        };
        let line = (0..width)
            .map(|j| match cells.get(j) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("Row {}: {}\n", i + 1, line));
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
    async fn default_range_and_padding() {
        let api = Arc::new(RecordingApi::new().respond(json!({
            "range": "Sheet1!A1:Z1000",
            "values": [["Name", "Qty", "Note"], ["Bolt", 4], [true, "x"]]
        })));
        let cmd = ReadSheetValues::new(api.clone());
        let mut args = ToolArgs::new();
        args.insert("spreadsheetId".into(), json!("sheet-1"));

        let text = result_text(&cmd.execute(&args).await.unwrap());
        assert!(text.starts_with("Read 3 rows from range \"A1:Z1000\""));
        assert!(text.contains("Row 1: Name | Qty | Note\n"));
        assert!(text.contains("Row 2: Bolt | 4 | \n"));
        assert!(text.contains("Row 3:  | x | \n"));

        assert!(api.requests()[0].url.ends_with("/sheet-1/values/A1%3AZ1000"));
    }

    #[tokio::test]
    async fn empty_range_is_not_an_error() {
        let api = Arc::new(RecordingApi::new().respond(json!({"range": "A1:B2"})));
        let cmd = ReadSheetValues::new(api);
        let mut args = ToolArgs::new();
        args.insert("spreadsheetId".into(), json!("s"));
        let result = cmd.execute(&args).await.unwrap();
        assert_eq!(result_text(&result), "No data found in the specified range.");
    }
}
