use serde::Deserialize;
use std::path::Path;

use crate::error::WorkspaceError;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// OAuth client registration as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl ClientConfig {
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT_URI)
    }
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientConfig>,
    web: Option<ClientConfig>,
}

/// Parse a client-secret document, preferring `installed` over `web`.
pub fn parse_client_secret(raw: &str) -> Result<ClientConfig, WorkspaceError> {
    let file: ClientSecretFile = serde_json::from_str(raw).map_err(|e| {
        WorkspaceError::Configuration(format!("Invalid credentials file: {}", e))
    })?;
    file.installed.or(file.web).ok_or_else(|| {
        WorkspaceError::Configuration(
            "Invalid credentials file format. \"installed\" or \"web\" property is required."
                .to_string(),
        )
    })
}

pub fn load_client_secret(path: &Path) -> Result<ClientConfig, WorkspaceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        WorkspaceError::Configuration(format!(
            "Cannot read credentials file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_client_secret(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_wins_over_web() {
        let cfg = parse_client_secret(
            r#"{"installed":{"client_id":"a","client_secret":"s","redirect_uris":["http://localhost:9"]},
                "web":{"client_id":"b","client_secret":"t"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.client_id, "a");
        assert_eq!(cfg.redirect_uri(), "http://localhost:9");
    }

    #[test]
    fn web_only_uses_default_redirect() {
        let cfg = parse_client_secret(r#"{"web":{"client_id":"b","client_secret":"t"}}"#).unwrap();
        assert_eq!(cfg.client_id, "b");
        assert_eq!(cfg.redirect_uri(), DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn neither_shape_is_a_configuration_error() {
        let err = parse_client_secret(r#"{"other":{}}"#).unwrap_err();
        assert!(matches!(err, WorkspaceError::Configuration(_)));
        let err = parse_client_secret("not json").unwrap_err();
        assert!(matches!(err, WorkspaceError::Configuration(_)));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_client_secret(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, WorkspaceError::Configuration(_)));
    }
}
