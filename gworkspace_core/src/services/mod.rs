//! The Google services and their commands.

#[cfg(feature = "drive")]
pub mod drive;
#[cfg(feature = "sheets")]
pub mod sheets;
#[cfg(feature = "slides")]
pub mod slides;

use serde::Deserialize;

use crate::google_api::{ApiRequest, DRIVE_FILES_URL};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
pub const PRESENTATION_MIME: &str = "application/vnd.google-apps.presentation";
pub const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

pub(crate) const UNKNOWN: &str = "unknown";
pub(crate) const UNNAMED: &str = "(no name)";

/// Drive `files` resource, the subset we ask for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub modified_time: Option<String>,
    pub web_view_link: Option<String>,
    /// Bytes, as a decimal string.
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// `files.list` across My Drive and shared drives.
pub fn drive_list_request(q: &str, page_size: u32, fields: &str, order_by: &str) -> ApiRequest {
    ApiRequest::get(DRIVE_FILES_URL)
        .query("q", q)
        .query("pageSize", page_size)
        .query("fields", fields)
        .query("orderBy", order_by)
        .query("supportsAllDrives", true)
        .query("includeItemsFromAllDrives", true)
}

/// One line per file: `- "name" (ID: id) | Modified: t | Link: url`.
pub(crate) fn summary_lines(files: &[DriveFile]) -> String {
    files
        .iter()
        .map(|f| {
            format!(
                "- \"{}\" (ID: {}) | Modified: {} | Link: {}",
                f.name.as_deref().unwrap_or(UNNAMED),
                f.id.as_deref().unwrap_or(UNKNOWN),
                f.modified_time.as_deref().unwrap_or(UNKNOWN),
                f.web_view_link.as_deref().unwrap_or("none"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
