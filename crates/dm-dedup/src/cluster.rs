//! Single-link clustering: connected components of the "score ≥ τ" graph.

use crate::matrix::ScoreMatrix;
use crate::similarity::SimilarityScore;
use dm_core::Corpus;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Disjoint-set over corpus indices with path compression and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }
        match self.rank[root_x].cmp(&self.rank[root_y]) {
            Ordering::Greater => self.parent[root_y] = root_x,
            Ordering::Less => self.parent[root_x] = root_y,
            Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }
}

/// A group of near-duplicate documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    /// Corpus indices, ascending.
    pub members: Vec<usize>,
    pub member_ids: Vec<String>,
    /// Pair scores at or above the threshold that link the members.
    pub edges: Vec<SimilarityScore>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.members.binary_search(&idx).is_ok()
    }
}

/// Partition the corpus into clusters. Cluster ids follow the order of each
/// cluster's first member.
pub fn build_clusters(corpus: &Corpus, matrix: &ScoreMatrix, threshold: f64) -> Vec<Cluster> {
    let n = corpus.len();
    let mut sets = DisjointSet::new(n);
    let mut edges = Vec::new();
    for (i, j, s) in matrix.pairs() {
        if s.score >= threshold {
            sets.union(i, j);
            edges.push((i, s));
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut root_first: Vec<Option<usize>> = vec![None; n];
    for idx in 0..n {
        let root = sets.find(idx);
        let first = *root_first[root].get_or_insert(idx);
        groups.entry(first).or_default().push(idx);
    }

    let mut clusters: Vec<Cluster> = groups
        .into_values()
        .enumerate()
        .map(|(id, members)| Cluster {
            id,
            member_ids: members
                .iter()
                .filter_map(|&m| corpus.get(m).map(|d| d.id().to_string()))
                .collect(),
            members,
            edges: Vec::new(),
        })
        .collect();

    let mut owner = vec![0usize; n];
    for cluster in &clusters {
        for &m in &cluster.members {
            owner[m] = cluster.id;
        }
    }
    for (i, s) in edges {
        clusters[owner[i]].edges.push(s.clone());
    }

    debug!(
        documents = n,
        clusters = clusters.len(),
        threshold,
        "clustering complete"
    );
    clusters
}
