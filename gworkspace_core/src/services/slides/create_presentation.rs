use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde_json::json;
use std::sync::Arc;

use super::edit_link;
use super::types::Presentation;
use crate::error::WorkspaceError;
use crate::google_api::{ApiRequest, GoogleApi, SLIDES_PRESENTATIONS_URL};
use crate::schema::{Param, ToolDescriptor};
use crate::service::Command;
use crate::utils::text_result;
use crate::ToolArgs;

pub struct CreatePresentation {
    api: Arc<dyn GoogleApi>,
}

impl CreatePresentation {
    pub fn new(api: Arc<dyn GoogleApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for CreatePresentation {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            "slides_create_presentation",
            "Create a new Google Slides presentation with a specified title.",
            vec![Param::string("title")
                .describe("Title of presentation")
                .required()],
        )
    }

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
        let title = match args.get("title") {
            None => "",
            Some(v) => v.as_str().unwrap_or("Untitled Presentation"),
        };
        if title.is_empty() {
            return Err(WorkspaceError::InvalidParams("title is required".into()));
        }

        let request = ApiRequest::post(SLIDES_PRESENTATIONS_URL, json!({ "title": title }));
        let created: Presentation = serde_json::from_value(
            self.api
                .send(request)
                .await
                .map_err(|e| e.context("Failed to create presentation"))?,
        )?;

        let id = created.presentation_id.as_deref().unwrap_or("unknown");
        Ok(text_result(format!(
            "Successfully created presentation: \"{}\"\nID: {}\nURL: {}",
            created.title.as_deref().unwrap_or("Untitled"),
            id,
            edit_link(id)
        )))
    }
}
