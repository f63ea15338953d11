use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use super::spreadsheet_url;
use super::types::Spreadsheet;
use crate::error::WorkspaceError;
use crate::google_api::{ApiRequest, GoogleApi};
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::UNKNOWN;
use crate::utils::{required_string, text_result};
use crate::ToolArgs;

const FIELDS: &str = "spreadsheetId,properties(title,locale,timeZone),sheets(properties(title,sheetId,gridProperties(rowCount,columnCount)))";

pub struct GetSpreadsheetInfo {
    api: Arc<dyn GoogleApi>,
}

impl GetSpreadsheetInfo {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for GetSpreadsheetInfo {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "sheets_get_spreadsheet_info",
            "Gets information about a specific spreadsheet including its sheets, properties, and structure.",
            vec![Param::string("spreadsheetId")
                .describe("The ID of the spreadsheet to get information for.")
                .required()],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let spreadsheet_id = required_string(args, "spreadsheetId")?;

        let request = ApiRequest::get(spreadsheet_url(spreadsheet_id)).query("fields", FIELDS);
        let value = self
            .api
            .send(request)
            .await
            .map_err(|e| e.context("Failed to get spreadsheet info"))?;
        let sheet: Spreadsheet = serde_json::from_value(value)?;

        Ok(text_result(render(spreadsheet_id, &sheet)))
    }
}

fn render(spreadsheet_id: &str, sheet: &Spreadsheet) -> String {
    let props = sheet.properties.clone().unwrap_or_default();
    let mut out = String::from("Spreadsheet info:\n\n");
    out.push_str(&format!(
        "Title: {}\n",
        props.title.as_deref().unwrap_or("Untitled")
    ));
    out.push_str(&format!("ID: {}\n", spreadsheet_id));
    out.push_str(&format!(
        "Locale: {}\n",
        props.locale.as_deref().unwrap_or(UNKNOWN)
    ));
    out.push_str(&format!(
        "Time zone: {}\n",
        props.time_zone.as_deref().unwrap_or(UNKNOWN)
    ));
    out.push_str(&format!(
        "URL: https://docs.google.com/spreadsheets/d/{}/edit\n\n",
        spreadsheet_id
    ));
    out.push_str(&format!("Sheets ({}):\n", sheet.sheets.len()));

    for s in &sheet.sheets {
        let p = s.properties.clone().unwrap_or_default();
        let grid = p.grid_properties.clone().unwrap_or_default();
        out.push_str(&format!(
            "  - {} (ID: {}, rows: {}, columns: {})\n",
            p.title.as_deref().unwrap_or("Untitled"),
            p.sheet_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            grid.row_count.unwrap_or(0),
            grid.column_count.unwrap_or(0)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sheet_ids_of_zero_are_shown() {
        let s: Spreadsheet = serde_json::from_value(json!({
            "properties": {"title": "Budget", "locale": "en_US", "timeZone": "Europe/Berlin"},
            "sheets": [
                {"properties": {"title": "Sheet1", "sheetId": 0,
                    "gridProperties": {"rowCount": 1000, "columnCount": 26}}},
                {"properties": {"title": "Notes"}}
            ]
        }))
        .unwrap();
        let out = render("abc", &s);
        assert!(out.contains("Title: Budget\n"));
        assert!(out.contains("Time zone: Europe/Berlin\n"));
        assert!(out.contains("Sheets (2):\n"));
        assert!(out.contains("  - Sheet1 (ID: 0, rows: 1000, columns: 26)\n"));
        assert!(out.contains("  - Notes (ID: unknown, rows: 0, columns: 0)\n"));
    }
}
