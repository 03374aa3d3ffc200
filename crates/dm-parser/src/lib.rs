//! Block segmentation and normalization for Markdown drafts.

pub mod normalize;
pub mod segmenter;
pub mod traits;

pub use normalize::{normalize, normalize_block, normalize_code, normalize_text};
pub use segmenter::Segmenter;
pub use traits::DocumentParser;

#[cfg(test)]
mod tests;
