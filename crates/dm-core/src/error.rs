use thiserror::Error;

#[derive(Error, Debug)]
pub enum DmError {
    #[error("Malformed document {doc}: code fence opened at line {line} is never closed")]
    MalformedDocument { doc: String, line: usize },
    #[error("Document not found: {id}")]
    NotFound { id: String },
    #[error("Read error for {id}: {reason}")]
    ReadError { id: String, reason: String },
    #[error("Document is not valid UTF-8: {id}")]
    InvalidUtf8 { id: String },
    #[error("Cannot merge an empty cluster")]
    EmptyCluster,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DmError {
    /// Errors that abort a single document's pipeline but not the batch.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            Self::MalformedDocument { .. }
                | Self::NotFound { .. }
                | Self::ReadError { .. }
                | Self::InvalidUtf8 { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DmError>;
