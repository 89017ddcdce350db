use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::session::SessionKind;

/// Persistence for bearer tokens, one slot per session kind.
pub trait TokenStore: Send + Sync {
    fn load(&self, kind: SessionKind) -> Option<String>;
    fn save(&self, kind: SessionKind, token: &str) -> Result<()>;
    fn clear(&self, kind: SessionKind) -> Result<()>;
}

/// Tokens kept in a small JSON object on disk, keyed by
/// [`SessionKind::storage_key`].
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed token file {}", self.path.display()))
    }

    fn write_all(&self, tokens: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(tokens)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, kind: SessionKind) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read_all() {
            Ok(mut tokens) => tokens.remove(kind.storage_key()),
            Err(e) => {
                warn!("Ignoring stored tokens: {:#}", e);
                None
            }
        }
    }

    fn save(&self, kind: SessionKind, token: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.read_all().unwrap_or_default();
        tokens.insert(kind.storage_key().to_owned(), token.to_owned());
        self.write_all(&tokens)?;
        debug!("Stored {} token", kind);
        Ok(())
    }

    fn clear(&self, kind: SessionKind) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.read_all().unwrap_or_default();
        if tokens.remove(kind.storage_key()).is_some() {
            self.write_all(&tokens)?;
            debug!("Cleared {} token", kind);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<SessionKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, kind: SessionKind) -> Option<String> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    fn save(&self, kind: SessionKind, token: &str) -> Result<()> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, token.to_owned());
        Ok(())
    }

    fn clear(&self, kind: SessionKind) -> Result<()> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        Ok(())
    }
}
