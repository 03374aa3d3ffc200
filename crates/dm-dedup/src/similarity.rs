//! Block-level LCS alignment and Dice similarity between documents.

use dm_core::{Block, Document};
use serde::{Deserialize, Serialize};

/// One step of an alignment between block sequences `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignOp {
    Match { a: usize, b: usize },
    OnlyA(usize),
    OnlyB(usize),
}

/// Matched `(a, b)` position pairs, strictly increasing on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub pairs: Vec<(usize, usize)>,
}

impl Alignment {
    pub fn matched(&self) -> usize {
        self.pairs.len()
    }
}

/// Pairwise similarity between two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub a: String,
    pub b: String,
    pub score: f64,
    pub alignment: Alignment,
}

/// Suffix LCS table: `cell(i, j)` is the LCS length of `a[i..]` and `b[j..]`.
struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    fn build(a: &[Block], b: &[Block]) -> Self {
        let cols = b.len() + 1;
        let mut cells = vec![0u32; (a.len() + 1) * cols];
        for i in (0..a.len()).rev() {
            for j in (0..b.len()).rev() {
                cells[i * cols + j] = if a[i].same_content(&b[j]) {
                    cells[(i + 1) * cols + j + 1] + 1
                } else {
                    cells[(i + 1) * cols + j].max(cells[i * cols + j + 1])
                };
            }
        }
        Self { cols, cells }
    }

    fn cell(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }
}

/// Full edit script between `a` and `b`. Equal blocks are always matched
/// when reached; otherwise the side that keeps the longer remaining LCS is
/// advanced, `a` first on ties.
pub fn edit_script(a: &[Block], b: &[Block]) -> Vec<AlignOp> {
    let table = LcsTable::build(a, b);
    let mut ops = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].same_content(&b[j]) {
            ops.push(AlignOp::Match { a: i, b: j });
            i += 1;
            j += 1;
        } else if table.cell(i + 1, j) >= table.cell(i, j + 1) {
            ops.push(AlignOp::OnlyA(i));
            i += 1;
        } else {
            ops.push(AlignOp::OnlyB(j));
            j += 1;
        }
    }
    ops.extend((i..a.len()).map(AlignOp::OnlyA));
    ops.extend((j..b.len()).map(AlignOp::OnlyB));
    ops
}

pub fn align(a: &[Block], b: &[Block]) -> Alignment {
    let pairs = edit_script(a, b)
        .into_iter()
        .filter_map(|op| match op {
            AlignOp::Match { a, b } => Some((a, b)),
            _ => None,
        })
        .collect();
    Alignment { pairs }
}

/// Dice coefficient over matched blocks. Two empty sequences are
/// identical; empty against non-empty scores zero.
pub fn dice(matched: usize, len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    (2 * matched) as f64 / total as f64
}

pub fn score(a: &Document, b: &Document) -> SimilarityScore {
    let alignment = align(a.blocks(), b.blocks());
    SimilarityScore {
        a: a.id().to_string(),
        b: b.id().to_string(),
        score: dice(alignment.matched(), a.len(), b.len()),
        alignment,
    }
}
