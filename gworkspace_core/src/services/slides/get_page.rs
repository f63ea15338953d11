use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use super::presentation_url;
use super::types::{shape_text, Page, PageElement};
use crate::error::WorkspaceError;
use crate::google_api::{ApiRequest, GoogleApi};
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::services::UNKNOWN;
use crate::utils::{required_string, text_result, truncate_chars};
use crate::ToolArgs;

const SHAPE_TEXT_PREVIEW: usize = 100;

pub struct GetPage {
    api: Arc<dyn GoogleApi>,
}

impl GetPage {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for GetPage {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "slides_get_page",
            "Get details about a specific page (slide) in a presentation including elements and layout.",
            vec![
                Param::string("presentationId")
                    .describe("The ID of the presentation.")
                    .required(),
                Param::string("pageObjectId")
                    .describe("The object ID of the page/slide to retrieve.")
                    .required(),
            ],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let presentation_id = required_string(args, "presentationId")?;
        let page_object_id = required_string(args, "pageObjectId")?;

        let url = format!(
            "{}/pages/{}",
            presentation_url(presentation_id),
            urlencoding::encode(page_object_id)
        );
        let value = self
            .api
            .send(ApiRequest::get(url))
            .await
            .map_err(|e| e.context("Failed to get page"))?;
        let page: Page = serde_json::from_value(value)?;

        Ok(text_result(render(presentation_id, page_object_id, &page)))
    }
}

fn render(presentation_id: &str, requested_id: &str, page: &Page) -> String {
    let object_id = page.object_id.as_deref().unwrap_or(requested_id);
    let mut out = String::from("Slide details:\n\n");
    out.push_str(&format!("Page ID: {}\n", object_id));
    out.push_str(&format!(
        "Page type: {}\n",
        page.page_type.as_deref().unwrap_or(UNKNOWN)
    ));
    out.push_str(&format!(
        "Presentation URL: https://docs.google.com/presentation/d/{}/edit#slide=id.{}\n\n",
        presentation_id, object_id
    ));
    out.push_str(&format!("Element count: {}\n\n", page.page_elements.len()));

    if !page.page_elements.is_empty() {
        out.push_str("Elements:\n");
        for element in &page.page_elements {
            out.push_str(&describe(element));
        }
    }
    out
}

fn describe(element: &PageElement) -> String {
    let id = element.object_id.as_deref().unwrap_or(UNKNOWN);
    if let Some(shape) = &element.shape {
        let mut s = format!(
            "  - Shape (ID: {}, type: {})\n",
            id,
            shape.shape_type.as_deref().unwrap_or(UNKNOWN)
        );
        let text = shape_text(shape);
        if !text.is_empty() {
            s.push_str(&format!(
                "    Text: {}\n",
                truncate_chars(&text, SHAPE_TEXT_PREVIEW)
            ));
        }
        s
    } else if let Some(table) = &element.table {
        format!(
            "  - Table (ID: {}, size: {} rows x {} columns)\n",
            id,
            table.rows.unwrap_or(0),
            table.columns.unwrap_or(0)
        )
    } else if let Some(line) = &element.line {
        format!(
            "  - Line (ID: {}, type: {})\n",
            id,
            line.line_type.as_deref().unwrap_or(UNKNOWN)
        )
    } else if element.image.is_some() {
        format!("  - Image (ID: {})\n", id)
    } else if element.video.is_some() {
        format!("  - Video (ID: {})\n", id)
    } else {
        format!("  - Other element (ID: {})\n", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google_api::RecordingApi;
    use crate::utils::result_text;
    use serde_json::json;

    #[tokio::test]
    async fn summarizes_each_element_kind() {
        let long = "x".repeat(150);
        let api = Arc::new(RecordingApi::new().respond(json!({
            "objectId": "p1",
            "pageType": "SLIDE",
            "pageElements": [
                {"objectId": "s1", "shape": {"shapeType": "TEXT_BOX",
                    "text": {"textElements": [{"textRun": {"content": long}}]}}},
                {"objectId": "t1", "table": {"rows": 2, "columns": 3}},
                {"objectId": "l1", "line": {"lineType": "STRAIGHT_LINE"}},
                {"objectId": "i1", "image": {}},
                {"objectId": "g1", "elementGroup": {}}
            ]
        })));
        let cmd = GetPage::new(api.clone());
        let mut args = ToolArgs::new();
        args.insert("presentationId".into(), json!("deck"));
        args.insert("pageObjectId".into(), json!("p1"));

        let text = result_text(&cmd.execute(&args).await.unwrap());
        assert!(text.contains("Element count: 5"));
        assert!(text.contains("edit#slide=id.p1"));
        assert!(text.contains(&format!("Text: {}...", "x".repeat(100))));
        assert!(text.contains("Table (ID: t1, size: 2 rows x 3 columns)"));
        assert!(text.contains("Line (ID: l1, type: STRAIGHT_LINE)"));
        assert!(text.contains("Image (ID: i1)"));
        assert!(text.contains("Other element (ID: g1)"));

        let reqs = api.requests();
        assert!(reqs[0].url.ends_with("/presentations/deck/pages/p1"));
    }
}
