//! Document sources: where raw draft bytes come from.

use crate::error::{DmError, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Read interface over a document collection.
pub trait DocumentSource: Send + Sync {
    /// Identifiers of every document, in the order they should be processed.
    fn list(&self) -> Result<Vec<String>>;

    /// Raw bytes of one document.
    fn read(&self, id: &str) -> Result<Vec<u8>>;

    /// Read and decode as UTF-8.
    fn read_to_string(&self, id: &str) -> Result<String> {
        let bytes = self.read(id)?;
        String::from_utf8(bytes).map_err(|_| DmError::InvalidUtf8 { id: id.to_string() })
    }
}

/// In-memory source; lists documents in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    docs: Vec<(String, Vec<u8>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(id, content);
        self
    }

    /// Insert or replace a document. Replacing keeps the original position.
    pub fn insert(&mut self, id: impl Into<String>, content: impl Into<Vec<u8>>) {
        let id = id.into();
        let content = content.into();
        match self.docs.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = content,
            None => self.docs.push((id, content)),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.docs.iter().map(|(id, _)| id.clone()).collect())
    }

    fn read(&self, id: &str) -> Result<Vec<u8>> {
        self.docs
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| DmError::NotFound { id: id.to_string() })
    }
}

/// Directory-backed source. Ids are `/`-separated paths relative to the
/// root, listed in lexicographic order.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let ext_with_dot = format!(".{ext}");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext_with_dot))
    }

    fn walk(&self, dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            let id = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if self.recursive {
                    self.walk(&path, &id, out)?;
                }
            } else if self.accepts(&path) {
                out.push(id);
            }
        }
        Ok(())
    }

    /// Resolve an id to a path under the root; ids that would escape it
    /// resolve to nothing.
    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let rel = Path::new(id);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl DocumentSource for DirSource {
    fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        self.walk(&self.root, "", &mut ids)?;
        ids.sort();
        debug!(root = %self.root.display(), count = ids.len(), "listed directory source");
        Ok(ids)
    }

    fn read(&self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .resolve(id)
            .ok_or_else(|| DmError::NotFound { id: id.to_string() })?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DmError::NotFound { id: id.to_string() },
            _ => DmError::ReadError {
                id: id.to_string(),
                reason: e.to_string(),
            },
        })
    }
}
