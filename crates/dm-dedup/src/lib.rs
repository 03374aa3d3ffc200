//! Near-duplicate detection and canonical merging for Markdown drafts.
//!
//! Stages:
//! 1. Similarity: block-level LCS alignment, Dice score
//! 2. Matrix: every pair scored once, in parallel
//! 3. Cluster: connected components over score ≥ τ
//! 4. Merge: canonical base per cluster plus per-position variants

pub mod cluster;
pub mod matrix;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod similarity;

pub use cluster::{build_clusters, Cluster};
pub use matrix::ScoreMatrix;
pub use merge::{merge_cluster, select_canonical, CanonicalBlock, CanonicalResult, Variant};
pub use pipeline::{Analysis, DedupPipeline, LoadOutcome};
pub use report::{DedupReport, DocumentFailure, DocumentSummary, FailureKind};
pub use similarity::{align, dice, edit_script, score, AlignOp, Alignment, SimilarityScore};
