mod get_spreadsheet_info;
mod list_spreadsheets;
mod read_sheet_values;
pub mod types;

pub use get_spreadsheet_info::GetSpreadsheetInfo;
pub use list_spreadsheets::ListSpreadsheets;
pub use read_sheet_values::ReadSheetValues;

use std::sync::Arc;

use crate::google_api::{GoogleApi, SHEETS_SPREADSHEETS_URL};
use crate::service::CommandService;

pub fn service(api: Arc<dyn GoogleApi>) -> CommandService {
    CommandService::new(
        "sheets",
        vec![
            Box::new(ListSpreadsheets::new(api.clone())),
            Box::new(GetSpreadsheetInfo::new(api.clone())),
            Box::new(ReadSheetValues::new(api)),
        ],
    )
}

pub(crate) fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("{}/{}", SHEETS_SPREADSHEETS_URL, urlencoding::encode(spreadsheet_id))
}
