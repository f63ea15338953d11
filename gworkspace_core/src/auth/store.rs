use std::path::{Path, PathBuf};

use super::token::TokenSet;
use crate::error::WorkspaceError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token not found at {0}")]
    NotFound(String),
    #[error("token file unreadable: {0}")]
    Unreadable(String),
    #[error("persist error: {0}")]
    Persist(String),
}

impl From<StoreError> for WorkspaceError {
    fn from(e: StoreError) -> Self {
        WorkspaceError::Authentication(e.to_string())
    }
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<TokenSet, StoreError>;
    fn save(&self, tokens: &TokenSet) -> Result<(), StoreError>;
    /// Human-readable location, used in error messages.
    fn location(&self) -> String;
}

/// In-memory store, mainly for tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: std::sync::Mutex<Option<TokenSet>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenSet) -> Self {
        Self {
            slot: std::sync::Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<TokenSet, StoreError> {
        self.slot
            .lock()
            .map_err(|e| StoreError::Unreadable(format!("lock poisoned: {}", e)))?
            .clone()
            .ok_or_else(|| StoreError::NotFound(self.location()))
    }

    fn save(&self, tokens: &TokenSet) -> Result<(), StoreError> {
        *self
            .slot
            .lock()
            .map_err(|e| StoreError::Persist(format!("lock poisoned: {}", e)))? =
            Some(tokens.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// The single JSON token file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<TokenSet, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.location()))
            }
            Err(e) => return Err(StoreError::Unreadable(format!("{}: {}", self.location(), e))),
        };
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unreadable(format!("{}: {}", self.location(), e)))
    }

    fn save(&self, tokens: &TokenSet) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(tokens)
            .map_err(|e| StoreError::Persist(format!("serde: {}", e)))?;
        std::fs::write(&self.path, &s).map_err(|e| StoreError::Persist(e.to_string()))?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| StoreError::Persist(format!("chmod: {}", e)))?;
        }

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));

        let tokens = TokenSet {
            access_token: Some("a".into()),
            refresh_token: Some("r".into()),
            expiry_date: Some(1),
            ..Default::default()
        };
        store.save(&tokens).unwrap();
        assert_eq!(store.load().unwrap(), tokens);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"access_token\""));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn memory_store_starts_empty_or_seeded() {
        assert!(matches!(
            MemoryTokenStore::new().load(),
            Err(StoreError::NotFound(_))
        ));

        let seeded = MemoryTokenStore::with_tokens(TokenSet {
            refresh_token: Some("r".into()),
            ..Default::default()
        });
        assert_eq!(seeded.load().unwrap().refresh_token.as_deref(), Some("r"));
        seeded.save(&TokenSet::default()).unwrap();
        assert_eq!(seeded.load().unwrap(), TokenSet::default());
    }

    #[test]
    fn garbage_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Unreadable(_))));
    }
}
