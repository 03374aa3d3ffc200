use dm_core::{Document, DmError, Result};

/// Trait for parsers that turn raw text into a [`Document`].
pub trait DocumentParser: Send + Sync {
    /// Parse content string into a document with the given id.
    fn parse_content(&self, id: &str, content: &str) -> Result<Document>;

    /// Parse from file path; the path doubles as the document id.
    fn parse_file(&self, path: &str) -> Result<Document> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DmError::NotFound { id: path.to_string() },
            std::io::ErrorKind::InvalidData => DmError::InvalidUtf8 { id: path.to_string() },
            _ => DmError::ReadError {
                id: path.to_string(),
                reason: e.to_string(),
            },
        })?;
        self.parse_content(path, &content)
    }

    /// Supported file extensions.
    fn supported_extensions(&self) -> Vec<String>;

    /// Check if a file can be parsed.
    fn can_parse(&self, path: &str) -> bool {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let ext_with_dot = format!(".{}", ext);
        self.supported_extensions().contains(&ext_with_dot)
    }
}
