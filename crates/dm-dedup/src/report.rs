//! Run report: serializable record of a pipeline run.

use crate::cluster::Cluster;
use crate::merge::CanonicalResult;
use chrono::{DateTime, Utc};
use dm_core::{DmError, Document, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedDocument,
    NotFound,
    ReadError,
    InvalidUtf8,
    Other,
}

impl From<&DmError> for FailureKind {
    fn from(err: &DmError) -> Self {
        match err {
            DmError::MalformedDocument { .. } => Self::MalformedDocument,
            DmError::NotFound { .. } => Self::NotFound,
            DmError::ReadError { .. } | DmError::Io(_) => Self::ReadError,
            DmError::InvalidUtf8 { .. } => Self::InvalidUtf8,
            _ => Self::Other,
        }
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl DocumentFailure {
    pub fn new(id: impl Into<String>, err: &DmError) -> Self {
        Self {
            id: id.into(),
            kind: FailureKind::from(err),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub blocks: usize,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            blocks: doc.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub documents: Vec<DocumentSummary>,
    pub failures: Vec<DocumentFailure>,
    pub clusters: Vec<Cluster>,
    pub canonical: Vec<CanonicalResult>,
}

impl DedupReport {
    pub fn new(
        threshold: f64,
        documents: Vec<DocumentSummary>,
        failures: Vec<DocumentFailure>,
        clusters: Vec<Cluster>,
        canonical: Vec<CanonicalResult>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            threshold,
            documents,
            failures,
            clusters,
            canonical,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Cluster containing the given document id.
    pub fn cluster_of(&self, id: &str) -> Option<&Cluster> {
        self.clusters
            .iter()
            .find(|c| c.member_ids.iter().any(|m| m == id))
    }

    /// Plain-text summary for terminals.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DedupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} documents, {} failed, {} clusters (threshold {:.2})",
            self.documents.len(),
            self.failures.len(),
            self.clusters.len(),
            self.threshold
        )?;
        for failure in &self.failures {
            writeln!(f, "  failed  {}: {}", failure.id, failure.message)?;
        }
        for (cluster, result) in self.clusters.iter().zip(&self.canonical) {
            writeln!(
                f,
                "cluster {} [{}] canonical: {}",
                cluster.id,
                cluster.member_ids.join(", "),
                result.canonical_id
            )?;
            for leading in &result.leading_insertions {
                writeln!(
                    f,
                    "  + (start) {}: {}",
                    leading.members.join(", "),
                    preview(&leading.text)
                )?;
            }
            for block in result.divergent_blocks() {
                writeln!(
                    f,
                    "  #{} {}: {}",
                    block.position,
                    block.kind,
                    preview(&block.canonical_text)
                )?;
                for v in block.variants.iter().skip(1) {
                    writeln!(f, "    ~ {}: {}", v.members.join(", "), preview(&v.text))?;
                }
                if !block.absent_from.is_empty() {
                    writeln!(f, "    - missing in {}", block.absent_from.join(", "))?;
                }
                for ins in &block.insertions {
                    writeln!(f, "    + {}: {}", ins.members.join(", "), preview(&ins.text))?;
                }
            }
        }
        Ok(())
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 60;
    let first = text.lines().next().unwrap_or("");
    if first.chars().count() > MAX || text.contains('\n') {
        let cut: String = first.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}
