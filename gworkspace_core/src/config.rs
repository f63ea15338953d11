use std::path::PathBuf;

pub const CREDENTIALS_PATH_ENV: &str = "GOOGLE_CREDENTIALS_PATH";
pub const TOKEN_PATH_ENV: &str = "GOOGLE_TOKEN_PATH";

/// Where the OAuth client secret and the user token live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
}

impl AuthConfig {
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
        }
    }

    /// Paths from `GOOGLE_CREDENTIALS_PATH` / `GOOGLE_TOKEN_PATH`, falling back to
    /// `credentials.json` / `token.json` in the working directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let pick = |key: &str, file: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| cwd.join(file))
        };
        Self {
            credentials_path: pick(CREDENTIALS_PATH_ENV, "credentials.json"),
            token_path: pick(TOKEN_PATH_ENV, "token.json"),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
