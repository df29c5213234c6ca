//! Script storage.
//!
//! Scripts are identified by a path relative to a configured root and
//! read fresh on every execution -- there is no in-memory script cache,
//! so edits on disk take effect immediately.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::EngineError;

/// Listing entry for one stored script.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptInfo {
    /// File name, e.g. `Indicator_ART.sql`.
    pub name: String,
    /// Identifier to pass back when executing, relative to the root.
    pub path: String,
}

/// Read-only access to the script files backing the report catalog.
#[async_trait::async_trait]
pub trait ScriptStore: Send + Sync {
    /// Read the full text of one script.
    async fn read(&self, id: &str) -> Result<String, EngineError>;

    /// List all available scripts.
    async fn list(&self) -> Result<Vec<ScriptInfo>, EngineError>;
}

/// Filesystem-backed script store rooted at a scripts directory.
pub struct FsScriptStore {
    root: PathBuf,
}

impl FsScriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an identifier under the root, rejecting absolute paths
    /// and any `..` component.
    fn resolve(&self, id: &str) -> Result<PathBuf, EngineError> {
        let relative = Path::new(id);
        let escapes = relative.components().any(|c| {
            !matches!(c, Component::Normal(_) | Component::CurDir)
        });
        if id.is_empty() || relative.is_absolute() || escapes {
            return Err(EngineError::InvalidScriptPath(id.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ScriptStore for FsScriptStore {
    async fn read(&self, id: &str) -> Result<String, EngineError> {
        let path = self.resolve(id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(EngineError::ScriptNotFound(id.to_string()))
            }
            Err(err) => Err(EngineError::Io(err)),
        }
    }

    async fn list(&self) -> Result<Vec<ScriptInfo>, EngineError> {
        let mut scripts = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // A missing root lists as empty rather than failing.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(EngineError::Io(err)),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "sql") {
                    let relative = path
                        .strip_prefix(&self.root)
                        .unwrap_or(&path)
                        .to_string_lossy()
                        .into_owned();
                    scripts.push(ScriptInfo {
                        name: entry.file_name().to_string_lossy().into_owned(),
                        path: relative,
                    });
                }
            }
        }

        scripts.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(scripts)
    }
}
