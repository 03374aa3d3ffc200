//! Core data model for DraftMerge.
//!
//! Documents are loaded into a [`Corpus`] arena and referenced by index;
//! blocks are immutable value records addressed by [`BlockRef`].

pub mod config;
pub mod document;
pub mod error;
pub mod source;

pub use config::{DedupConfig, SegmenterConfig};
pub use document::{Block, BlockKind, BlockRef, Corpus, Document};
pub use error::{DmError, Result};
pub use source::{DirSource, DocumentSource, MemorySource};
