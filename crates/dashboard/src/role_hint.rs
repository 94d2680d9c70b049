//! One-shot role hint
//!
//! The role picked before signing in is written to a small JSON file and
//! read back exactly once afterwards to choose the first tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;
use crate::views::ViewKind;

/// Tab used when no hint was stashed
pub const DEFAULT_ROLE: ViewKind = ViewKind::Consumer;

#[derive(Debug, Serialize, Deserialize)]
struct RoleHint {
    role: ViewKind,
    stashed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RoleHintStore {
    path: PathBuf,
}

impl RoleHintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remember `role` for the next `take`
    pub fn stash(&self, role: ViewKind) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let hint = RoleHint {
            role,
            stashed_at: Utc::now(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&hint)?)?;
        debug!("Stashed role hint '{}' at {}", role, self.path.display());
        Ok(())
    }

    /// Consume the stashed role, falling back to the default
    ///
    /// The file is removed whether or not it parsed, so a hint never applies twice.
    pub fn take(&self) -> Result<ViewKind> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DEFAULT_ROLE),
            Err(e) => return Err(e.into()),
        };
        std::fs::remove_file(&self.path)?;

        match serde_json::from_slice::<RoleHint>(&content) {
            Ok(hint) => {
                debug!("Using role hint '{}' stashed at {}", hint.role, hint.stashed_at);
                Ok(hint.role)
            }
            Err(e) => {
                warn!("Ignoring unreadable role hint {}: {}", self.path.display(), e);
                Ok(DEFAULT_ROLE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_is_consumed_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoleHintStore::new(dir.path().join("state").join("role.json"));

        assert_eq!(store.take().unwrap(), DEFAULT_ROLE);

        store.stash(ViewKind::Inspector).unwrap();
        assert_eq!(store.take().unwrap(), ViewKind::Inspector);
        assert_eq!(store.take().unwrap(), DEFAULT_ROLE);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_hint_falls_back_and_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("role.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = RoleHintStore::new(&path);
        assert_eq!(store.take().unwrap(), DEFAULT_ROLE);
        assert!(!path.exists());
    }
}
