use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub presentation_id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<Page>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub object_id: Option<String>,
    pub page_type: Option<String>,
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    pub object_id: Option<String>,
    pub shape: Option<Shape>,
    pub table: Option<Table>,
    pub line: Option<Line>,
    pub image: Option<Value>,
    pub video: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub shape_type: Option<String>,
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
}

impl TextContent {
    /// Concatenated text runs, trimmed.
    pub fn plain_text(&self) -> String {
        self.text_elements
            .iter()
            .filter_map(|e| e.text_run.as_ref()?.content.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRun {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub rows: Option<i64>,
    pub columns: Option<i64>,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCell {
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub line_type: Option<String>,
}

pub fn shape_text(shape: &Shape) -> String {
    shape.text.as_ref().map(TextContent::plain_text).unwrap_or_default()
}

/// Rows of non-empty cell texts joined by ` | `; empty rows are dropped.
pub fn table_text(table: &Table) -> String {
    table
        .table_rows
        .iter()
        .map(|row| {
            row.table_cells
                .iter()
                .filter_map(|c| c.text.as_ref().map(TextContent::plain_text))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .filter(|r| !r.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
