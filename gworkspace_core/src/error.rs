// src/error.rs
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Missing or malformed client-secret file. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or unusable token. Fatal at startup in server mode.
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// A Google API call failed (network, quota, permission, not-found...).
    #[error("{0}")]
    RemoteCall(String),

    #[error("Method not found")]
    MethodNotFound,

    /// An inbound line that is not JSON. Carries the parser's message.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl WorkspaceError {
    /// Prefix a remote failure with what the command was trying to do.
    pub fn context(self, what: &str) -> Self {
        match self {
            WorkspaceError::InvalidParams(_)
            | WorkspaceError::Configuration(_)
            | WorkspaceError::Authentication(_) => self,
            other => WorkspaceError::RemoteCall(format!("{}: {}", what, other)),
        }
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            WorkspaceError::Configuration(_) => "config_error",
            WorkspaceError::Authentication(_) => "auth_failed",
            WorkspaceError::InvalidParams(_) => "invalid_params",
            WorkspaceError::RemoteCall(_) => "upstream_error",
            WorkspaceError::HttpRequest(_) => "upstream_error",
            WorkspaceError::MethodNotFound => "method_not_found",
            WorkspaceError::ParseError(_) => "parse_error",
            WorkspaceError::Io(_) | WorkspaceError::SerdeJson(_) => "internal_error",
        }
    }

    pub fn to_jsonrpc_error(&self) -> serde_json::Value {
        let (code, message) = match self {
            WorkspaceError::InvalidParams(msg) => (-32602, msg.to_string()),
            WorkspaceError::MethodNotFound => (-32601, "Method not found".to_string()),
            WorkspaceError::ParseError(detail) => {
                return json!({
                    "code": -32700,
                    "message": "Parse error",
                    "data": detail,
                })
            }
            WorkspaceError::SerdeJson(e) => (-32602, format!("Invalid params: {}", e)),
            err => (-32603, err.to_string()),
        };

        json!({
            "code": code,
            "message": message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_remote_failures_only() {
        let remote = WorkspaceError::RemoteCall("quota exceeded".into())
            .context("Failed to create presentation");
        assert_eq!(
            remote.to_string(),
            "Failed to create presentation: quota exceeded"
        );

        let invalid = WorkspaceError::InvalidParams("title is required".into())
            .context("Failed to create presentation");
        assert_eq!(invalid.to_string(), "Invalid params: title is required");
    }

    #[test]
    fn jsonrpc_codes() {
        assert_eq!(
            WorkspaceError::MethodNotFound.to_jsonrpc_error()["code"],
            -32601
        );
        let parse = WorkspaceError::ParseError("expected value".into()).to_jsonrpc_error();
        assert_eq!(parse["code"], -32700);
        assert_eq!(parse["message"], "Parse error");
        assert_eq!(parse["data"], "expected value");
        assert_eq!(
            WorkspaceError::InvalidParams("x".into()).to_jsonrpc_error()["code"],
            -32602
        );
        assert_eq!(
            WorkspaceError::RemoteCall("boom".into()).to_jsonrpc_error()["code"],
            -32603
        );
    }

    #[test]
    fn short_codes() {
        assert_eq!(
            WorkspaceError::InvalidParams("x".into()).code_str(),
            "invalid_params"
        );
        assert_eq!(
            WorkspaceError::RemoteCall("quota".into()).code_str(),
            "upstream_error"
        );
        assert_eq!(
            WorkspaceError::Authentication("expired".into()).code_str(),
            "auth_failed"
        );
        assert_eq!(WorkspaceError::ParseError("x".into()).code_str(), "parse_error");
    }
}
