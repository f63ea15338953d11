mod list_items;
mod search_files;

pub use list_items::ListItems;
pub use search_files::{build_search_query, SearchFiles};

use std::sync::Arc;

use crate::google_api::GoogleApi;
use crate::service::CommandService;

pub(crate) const FILE_FIELDS: &str = "files(id, name, mimeType, modifiedTime, webViewLink, size)";

pub fn service(api: Arc<dyn GoogleApi>) -> CommandService {
    CommandService::new(
        "drive",
        vec![
            Box::new(SearchFiles::new(api.clone())),
            Box::new(ListItems::new(api)),
        ],
    )
}
