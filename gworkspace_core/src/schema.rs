use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::WorkspaceError;
use crate::ToolArgs;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

impl ParamType {
    pub fn json_type(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

/// One recognized tool parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    pub description: Option<String>,
    pub default: Option<Value>,
}

impl Param {
    fn new(name: &str, param_type: ParamType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            required: false,
            description: None,
            default: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, ParamType::Number)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, ParamType::Boolean)
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ParamSchema {
    pub params: Vec<Param>,
}

impl ParamSchema {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Render as a JSON-Schema object for `tools/list`.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let mut props = Map::new();
        let mut required: Vec<String> = Vec::new();
        for p in &self.params {
            let mut obj = Map::new();
            obj.insert("type".to_string(), json!(p.param_type.json_type()));
            if let Some(desc) = &p.description {
                obj.insert("description".to_string(), json!(desc));
            }
            if let Some(default) = &p.default {
                obj.insert("default".to_string(), default.clone());
            }
            props.insert(p.name.clone(), Value::Object(obj));
            if p.required {
                required.push(p.name.clone());
            }
        }
        let mut root = Map::new();
        root.insert("type".to_string(), json!("object"));
        root.insert("properties".to_string(), Value::Object(props));
        root.insert("required".to_string(), json!(required));
        root
    }

    /// Type-check declared parameters and fill in declared defaults.
    ///
    /// Absent required parameters are left for the command to report, so the
    /// caller still gets an in-band tool failure rather than a protocol error.
    /// Undeclared keys pass through untouched.
    pub fn apply(&self, args: &ToolArgs) -> Result<ToolArgs, WorkspaceError> {
        let mut out = args.clone();
        for p in &self.params {
            match out.get(&p.name) {
                None | Some(Value::Null) => {
                    if let Some(default) = &p.default {
                        out.insert(p.name.clone(), default.clone());
                    } else {
                        out.remove(&p.name);
                    }
                }
                Some(value) if !p.param_type.accepts(value) => {
                    return Err(WorkspaceError::InvalidParams(format!(
                        "'{}' must be a {}",
                        p.name,
                        p.param_type.json_type()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(out)
    }
}

/// Name, description and parameter schema of one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub schema: ParamSchema,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, params: Vec<Param>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema: ParamSchema::new(params),
        }
    }

    pub fn to_tool(&self) -> Tool {
        Tool {
            name: Cow::Owned(self.name.clone()),
            title: None,
            description: Some(Cow::Owned(self.description.clone())),
            input_schema: Arc::new(self.schema.to_json_schema()),
            output_schema: None,
            annotations: None,
            icons: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_values() -> ToolDescriptor {
        ToolDescriptor::new(
            "sheets_read_sheet_values",
            "Reads values",
            vec![
                Param::string("spreadsheetId").required(),
                Param::string("range")
                    .describe("A1 range")
                    .default_value("A1:Z1000"),
            ],
        )
    }

    #[test]
    fn json_schema_lists_required_and_defaults() {
        let schema = read_values().schema.to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["spreadsheetId"]));
        assert_eq!(schema["properties"]["range"]["default"], "A1:Z1000");
        assert_eq!(schema["properties"]["range"]["description"], "A1 range");
        assert_eq!(schema["properties"]["spreadsheetId"]["type"], "string");
    }

    #[test]
    fn apply_fills_defaults_and_rejects_wrong_types() {
        let desc = read_values();

        let mut args = ToolArgs::new();
        args.insert("spreadsheetId".into(), json!("abc"));
        let applied = desc.schema.apply(&args).unwrap();
        assert_eq!(applied["range"], "A1:Z1000");

        args.insert("range".into(), json!(42));
        let err = desc.schema.apply(&args).unwrap_err();
        assert!(err.to_string().contains("'range' must be a string"));
    }

    #[test]
    fn apply_leaves_missing_required_for_the_command() {
        let applied = read_values().schema.apply(&ToolArgs::new()).unwrap();
        assert!(!applied.contains_key("spreadsheetId"));
    }

    #[test]
    fn to_tool_carries_name_and_schema() {
        let tool = read_values().to_tool();
        assert_eq!(tool.name, "sheets_read_sheet_values");
        assert_eq!(tool.input_schema["type"], "object");
    }
}
