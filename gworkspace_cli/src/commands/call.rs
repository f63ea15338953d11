use std::sync::Arc;

use gworkspace_core::google_api::RecordingApi;
use gworkspace_core::schema::{ParamSchema, ParamType};
use gworkspace_core::utils::is_error;
use gworkspace_core::{build_service_manager, ToolArgs};
use serde_json::Value;
use tracing::debug;

use crate::cli::Cli;
use crate::commands::{authenticated_manager, CommandError, Result};
use crate::output::{format_output, OutputData};

pub async fn run(cli: &Cli, tool: &str, args: Option<&str>, params: &[String]) -> Result<()> {
    // Resolve the descriptor before touching credentials so typos fail fast.
    let descriptor = build_service_manager(Arc::new(RecordingApi::new()))
        .descriptor(tool)
        .ok_or_else(|| CommandError::ToolNotFound(tool.to_string()))?;

    let raw = match args {
        Some(json) => parse_json_args(json)?,
        None => parse_pairs(&descriptor.schema, params)?,
    };
    let args = descriptor.schema.apply(&raw)?;
    debug!("calling {} with {}", tool, serde_json::Value::Object(args.clone()));

    let manager = authenticated_manager(cli).await?;
    let result = manager.handle_tool_call(tool, args).await;
    let failed = is_error(&result);

    format_output(
        &OutputData::CallResult {
            tool: tool.to_string(),
            result: serde_json::to_value(&result)?,
        },
        &cli.output,
    )?;

    if failed {
        return Err(CommandError::ToolFailed(tool.to_string()));
    }
    Ok(())
}

fn parse_json_args(json: &str) -> Result<ToolArgs> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        other => Err(CommandError::InvalidArgs(format!(
            "--args must be a JSON object, got {}",
            other
        ))),
    }
}

/// `key=value` pairs, typed by the declared parameter. Undeclared keys are
/// read as JSON when they parse, otherwise as strings.
fn parse_pairs(schema: &ParamSchema, pairs: &[String]) -> Result<ToolArgs> {
    let mut out = ToolArgs::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            CommandError::InvalidArgs(format!("expected key=value, got '{}'", pair))
        })?;
        let value = match schema.param(key).map(|p| p.param_type) {
            Some(ParamType::String) => Value::String(raw.to_string()),
            Some(ParamType::Number) => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| {
                    CommandError::InvalidArgs(format!("{} must be a number, got '{}'", key, raw))
                })?,
            Some(ParamType::Boolean) => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => {
                    return Err(CommandError::InvalidArgs(format!(
                        "{} must be true or false, got '{}'",
                        key, raw
                    )))
                }
            },
            None => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        };
        out.insert(key.to_string(), value);
    }
    Ok(out)
}
