use crate::cli::OutputFormat;
use crate::commands::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    ToolsList {
        service: Option<String>,
        tools: Vec<ToolRow>,
    },
    CallResult {
        tool: String,
        result: Value,
    },
    TokenStatus(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRow {
    pub service: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(data)?),
        OutputFormat::Text => format_text_output(data)?,
        OutputFormat::Pretty => format_pretty_output(data)?,
    }
    Ok(())
}

fn format_text_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::ToolsList { tools, .. } => {
            for tool in tools {
                println!("{}: {}", tool.name, tool.description);
            }
        }
        OutputData::CallResult { result, .. } => println!("{}", result_text(result)),
        OutputData::TokenStatus(status) => {
            if let Some(map) = status.as_object() {
                for (k, v) in map {
                    println!("{}: {}", k, plain(v));
                }
            }
        }
    }
    Ok(())
}

fn format_pretty_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::ToolsList { service, tools } => {
            match service {
                Some(s) => println!("{} {}", "Tools for".bold().cyan(), s.yellow()),
                None => println!("{}", "Available tools".bold().cyan()),
            }
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Service", "Tool", "Parameters", "Description"]);
            for tool in tools {
                let params = tool
                    .parameters
                    .iter()
                    .map(|p| {
                        let mut s = format!("{}: {}", p.name, p.kind);
                        if p.required {
                            s.push_str(" *");
                        }
                        if let Some(d) = &p.default {
                            s.push_str(&format!(" = {}", d));
                        }
                        s
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                table.add_row(vec![
                    tool.service.clone(),
                    tool.name.clone(),
                    params,
                    tool.description.clone(),
                ]);
            }
            println!("{table}");
            println!();
            println!("{} {}", tools.len().to_string().bold(), "tools (* = required)".dimmed());
        }
        OutputData::CallResult { tool, result } => {
            let failed = result
                .get("isError")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if failed {
                println!("{} {}", "✗".red().bold(), tool.bold());
            } else {
                println!("{} {}", "✓".green().bold(), tool.bold());
            }
            println!();
            println!("{}", result_text(result));
        }
        OutputData::TokenStatus(status) => {
            if let Some(map) = status.as_object() {
                for (k, v) in map {
                    println!("  {:<16} {}", format!("{}:", k).dimmed(), plain(v));
                }
            }
        }
    }
    Ok(())
}

/// Text blocks of a serialized `CallToolResult`.
pub fn result_text(result: &Value) -> String {
    result
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn plain(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
