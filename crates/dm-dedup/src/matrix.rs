//! Pairwise score matrix. Each unordered pair is scored exactly once; the
//! matrix is read-only once built.

use crate::similarity::{self, SimilarityScore};
use dm_core::Corpus;
use rayon::prelude::*;
use tracing::debug;

/// Upper-triangular matrix of [`SimilarityScore`]s over corpus indices.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    n: usize,
    cells: Vec<SimilarityScore>,
}

impl ScoreMatrix {
    /// Score every pair of documents. Returns only after all cells are
    /// filled.
    pub fn compute(corpus: &Corpus, parallel: bool) -> Self {
        let n = corpus.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let docs = corpus.documents();

        let cells: Vec<SimilarityScore> = if parallel {
            pairs
                .par_iter()
                .map(|&(i, j)| similarity::score(&docs[i], &docs[j]))
                .collect()
        } else {
            pairs
                .iter()
                .map(|&(i, j)| similarity::score(&docs[i], &docs[j]))
                .collect()
        };
        debug!(documents = n, pairs = cells.len(), parallel, "score matrix complete");
        Self { n, cells }
    }

    fn cell_index(&self, i: usize, j: usize) -> usize {
        i * self.n - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Score record for a pair, in either order. `None` on the diagonal or
    /// out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<&SimilarityScore> {
        if i == j || i >= self.n || j >= self.n {
            return None;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.cells.get(self.cell_index(lo, hi))
    }

    /// Scalar score; the diagonal is 1.0.
    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        if i == j && i < self.n {
            return Some(1.0);
        }
        self.get(i, j).map(|s| s.score)
    }

    /// All `(i, j, score)` cells with `i < j`, row by row.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, &SimilarityScore)> + '_ {
        let n = self.n;
        (0..n)
            .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
            .zip(self.cells.iter())
            .map(|((i, j), s)| (i, j, s))
    }

    /// Number of documents.
    pub fn size(&self) -> usize {
        self.n
    }
}
