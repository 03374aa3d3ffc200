use crate::error::{DmError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Near-duplicate threshold τ in (0, 1].
    pub threshold: f64,
    pub segmenter: SegmenterConfig,
    /// Score pairs and segment documents on the rayon pool.
    pub parallel: bool,
    /// File extensions picked up by directory sources.
    pub extensions: Vec<String>,
    /// Descend into subdirectories of a directory source.
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub fence_marker: String,
    pub heading_marker: char,
    pub strip_frontmatter: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            segmenter: SegmenterConfig::default(),
            parallel: true,
            extensions: vec![
                ".md".into(),
                ".markdown".into(),
                ".mdown".into(),
                ".mkd".into(),
            ],
            recursive: false,
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            fence_marker: "```".into(),
            heading_marker: '#',
            strip_frontmatter: false,
        }
    }
}

impl DedupConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(DmError::InvalidConfig(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        self.segmenter.validate()
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fence_marker.is_empty() {
            return Err(DmError::InvalidConfig("fence marker is empty".into()));
        }
        if self.fence_marker.chars().any(char::is_whitespace) {
            return Err(DmError::InvalidConfig(format!(
                "fence marker contains whitespace: {:?}",
                self.fence_marker
            )));
        }
        if self.heading_marker.is_whitespace() {
            return Err(DmError::InvalidConfig(
                "heading marker must not be whitespace".into(),
            ));
        }
        Ok(())
    }
}
