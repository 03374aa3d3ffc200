//! Documents, blocks and the corpus arena.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Block-level unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading => write!(f, "heading"),
            BlockKind::Paragraph => write!(f, "paragraph"),
            BlockKind::Code => write!(f, "code"),
        }
    }
}

/// A heading, paragraph or code unit in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Verbatim source text.
    pub raw: String,
    /// Comparison form.
    pub normalized: String,
    /// Index within the owning document.
    pub position: usize,
    /// 1-based source line the block starts on.
    pub line: usize,
}

impl Block {
    /// Alignment equality: same kind and identical normalized text.
    pub fn same_content(&self, other: &Block) -> bool {
        self.kind == other.kind && self.normalized == other.normalized
    }
}

/// Reference to a block inside a [`Corpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockRef {
    pub doc: usize,
    pub position: usize,
}

impl BlockRef {
    pub fn new(doc: usize, position: usize) -> Self {
        Self { doc, position }
    }
}

/// An ordered sequence of blocks loaded from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(id: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            blocks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Arena of loaded documents in input order.
///
/// Everything downstream refers to documents by their index here, which
/// doubles as the stable caller-supplied ordering used for tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    id_map: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document and return its index. A repeated id shadows the
    /// earlier entry in id lookups.
    pub fn push(&mut self, document: Document) -> usize {
        let idx = self.documents.len();
        self.id_map.insert(document.id().to_string(), idx);
        self.documents.push(document);
        idx
    }

    pub fn get(&self, idx: usize) -> Option<&Document> {
        self.documents.get(idx)
    }

    pub fn by_id(&self, id: &str) -> Option<&Document> {
        self.index_of(id).and_then(|i| self.get(i))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_map.get(id).copied()
    }

    pub fn block(&self, r: BlockRef) -> Option<&Block> {
        self.get(r.doc).and_then(|d| d.block(r.position))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for doc in iter {
            corpus.push(doc);
        }
        corpus
    }
}
