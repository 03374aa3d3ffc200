//! Dedup pipeline: load → segment → score → cluster → merge.

use crate::cluster::{build_clusters, Cluster};
use crate::matrix::ScoreMatrix;
use crate::merge::{merge_cluster, CanonicalResult};
use crate::report::{DedupReport, DocumentFailure, DocumentSummary};
use dm_core::{Corpus, DedupConfig, Document, DocumentSource, Result};
use dm_parser::{DocumentParser, Segmenter};
use rayon::prelude::*;
use tracing::{info, warn};

/// Documents that loaded, plus the ones that did not.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub corpus: Corpus,
    pub failures: Vec<DocumentFailure>,
}

/// Everything computed from a loaded corpus.
#[derive(Debug)]
pub struct Analysis {
    pub matrix: ScoreMatrix,
    pub clusters: Vec<Cluster>,
    pub canonical: Vec<CanonicalResult>,
}

/// The main dedup pipeline.
pub struct DedupPipeline {
    config: DedupConfig,
    segmenter: Segmenter,
}

impl DedupPipeline {
    pub fn new(config: DedupConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(&config.segmenter)?;
        Ok(Self { config, segmenter })
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Read and segment every listed document. A failing listing aborts;
    /// a failing document is recorded and skipped.
    pub fn load(&self, source: &dyn DocumentSource) -> Result<LoadOutcome> {
        let ids = source.list()?;
        let parse = |id: &String| -> (String, Result<Document>) {
            let doc = source
                .read_to_string(id)
                .and_then(|text| self.segmenter.parse_content(id, &text));
            (id.clone(), doc)
        };
        let parsed: Vec<(String, Result<Document>)> = if self.config.parallel {
            ids.par_iter().map(parse).collect()
        } else {
            ids.iter().map(parse).collect()
        };

        let mut outcome = LoadOutcome::default();
        for (id, doc) in parsed {
            match doc {
                Ok(doc) => {
                    outcome.corpus.push(doc);
                }
                Err(e) => {
                    warn!(document = %id, error = %e, "document skipped");
                    outcome.failures.push(DocumentFailure::new(id, &e));
                }
            }
        }
        info!(
            loaded = outcome.corpus.len(),
            failed = outcome.failures.len(),
            "documents loaded"
        );
        Ok(outcome)
    }

    /// Score, cluster and merge a loaded corpus.
    pub fn analyze(&self, corpus: &Corpus) -> Result<Analysis> {
        let matrix = ScoreMatrix::compute(corpus, self.config.parallel);
        let clusters = build_clusters(corpus, &matrix, self.config.threshold);
        let canonical = clusters
            .iter()
            .map(|c| merge_cluster(c, corpus))
            .collect::<Result<Vec<_>>>()?;
        info!(
            documents = corpus.len(),
            clusters = clusters.len(),
            duplicates = clusters.iter().filter(|c| !c.is_singleton()).count(),
            "analysis complete"
        );
        Ok(Analysis {
            matrix,
            clusters,
            canonical,
        })
    }

    pub fn run(&self, source: &dyn DocumentSource) -> Result<DedupReport> {
        let LoadOutcome { corpus, failures } = self.load(source)?;
        let analysis = self.analyze(&corpus)?;
        Ok(DedupReport::new(
            self.config.threshold,
            corpus.documents().iter().map(DocumentSummary::from).collect(),
            failures,
            analysis.clusters,
            analysis.canonical,
        ))
    }
}
