use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

use super::presentation_url;
use super::types::{shape_text, table_text, Presentation};
use crate::error::WorkspaceError;
use crate::google_api::{ApiRequest, GoogleApi};
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::utils::{required_string, text_result};
use crate::ToolArgs;

/// Dumps the text of every slide: shape text first, then table rows.
pub struct GetPresentation {
    api: Arc<dyn GoogleApi>,
}

impl GetPresentation {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for GetPresentation {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "slides_get_presentation",
            "Read content from a presentation including text and tables to understand specifications.",
            vec![Param::string("presentationId")
                .describe("ID of the presentation")
                .required()],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let presentation_id = required_string(args, "presentationId")?;

        let value = self
            .api
            .send(ApiRequest::get(presentation_url(presentation_id)))
            .await
            .map_err(|e| e.context("Failed to get presentation"))?;
        let presentation: Presentation = serde_json::from_value(value)?;

        Ok(text_result(render(&presentation)))
    }
}

fn render(presentation: &Presentation) -> String {
    let mut out = format!(
        "Title: {}\n\n",
        presentation.title.as_deref().unwrap_or("Untitled")
    );
    for (index, slide) in presentation.slides.iter().enumerate() {
        out.push_str(&format!("--- Slide {} ---\n", index + 1));
        for element in &slide.page_elements {
            if let Some(shape) = &element.shape {
                let text = shape_text(shape);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
            if let Some(table) = &element.table {
                let text = table_text(table);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
        }
        out.push('\n');
    }
    out
}
