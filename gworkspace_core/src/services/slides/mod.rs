mod create_presentation;
mod get_page;
mod get_presentation;
mod list_presentations;
pub mod types;

pub use create_presentation::CreatePresentation;
pub use get_page::GetPage;
pub use get_presentation::GetPresentation;
pub use list_presentations::ListPresentations;

use std::sync::Arc;

use crate::google_api::{GoogleApi, SLIDES_PRESENTATIONS_URL};
use crate::service::CommandService;

pub fn service(api: Arc<dyn GoogleApi>) -> CommandService {
    CommandService::new(
        "slides",
        vec![
            Box::new(CreatePresentation::new(api.clone())),
            Box::new(GetPresentation::new(api.clone())),
            Box::new(ListPresentations::new(api.clone())),
            Box::new(GetPage::new(api)),
        ],
    )
}

pub(crate) fn presentation_url(presentation_id: &str) -> String {
    format!("{}/{}", SLIDES_PRESENTATIONS_URL, urlencoding::encode(presentation_id))
}

pub(crate) fn edit_link(presentation_id: &str) -> String {
    format!(
        "https://docs.google.com/presentation/d/{}/edit",
        presentation_id
    )
}
