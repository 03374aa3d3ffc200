//! Canonical merge: pick a base document per cluster and record, for every
//! base position, which texts the other members carry there.

use crate::cluster::Cluster;
use crate::similarity::{edit_script, AlignOp};
use dm_core::{BlockKind, BlockRef, Corpus, DmError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One distinct text observed at a position, with the members carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub kind: BlockKind,
    pub text: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalBlock {
    pub position: usize,
    pub kind: BlockKind,
    pub canonical_text: String,
    /// Distinct texts at this position; the canonical text comes first.
    pub variants: Vec<Variant>,
    /// Members with nothing aligned to this position.
    pub absent_from: Vec<String>,
    /// Member blocks with no base counterpart, following this position.
    pub insertions: Vec<Variant>,
}

impl CanonicalBlock {
    pub fn is_divergent(&self) -> bool {
        self.variants.len() > 1 || !self.absent_from.is_empty() || !self.insertions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub cluster_id: usize,
    pub canonical_id: String,
    pub members: Vec<String>,
    /// Insertions that precede every base position.
    pub leading_insertions: Vec<Variant>,
    pub blocks: Vec<CanonicalBlock>,
}

impl CanonicalResult {
    pub fn divergent_blocks(&self) -> impl Iterator<Item = &CanonicalBlock> {
        self.blocks.iter().filter(|b| b.is_divergent())
    }

    pub fn is_unanimous(&self) -> bool {
        self.leading_insertions.is_empty() && self.divergent_blocks().next().is_none()
    }
}

#[derive(Default)]
struct Slot {
    observed: Vec<BlockRef>,
    absent: Vec<usize>,
    inserted: Vec<BlockRef>,
}

/// Member with the most blocks; ties go to the earliest in input order.
pub fn select_canonical(members: &[usize], corpus: &Corpus) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    for idx in sorted {
        let Some(doc) = corpus.get(idx) else { continue };
        if best.map_or(true, |(_, len)| doc.len() > len) {
            best = Some((idx, doc.len()));
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn merge_cluster(cluster: &Cluster, corpus: &Corpus) -> Result<CanonicalResult> {
    if cluster.members.is_empty() {
        return Err(DmError::EmptyCluster);
    }
    for &m in &cluster.members {
        if corpus.get(m).is_none() {
            return Err(DmError::NotFound {
                id: format!("#{m}"),
            });
        }
    }
    let base_idx = select_canonical(&cluster.members, corpus).ok_or(DmError::EmptyCluster)?;
    let base = corpus.get(base_idx).ok_or(DmError::EmptyCluster)?;

    let mut slots: Vec<Slot> = (0..base.len()).map(|_| Slot::default()).collect();
    let mut leading: Vec<BlockRef> = Vec::new();

    for (pos, slot) in slots.iter_mut().enumerate() {
        slot.observed.push(BlockRef::new(base_idx, pos));
    }

    for &m in cluster.members.iter().filter(|&&m| m != base_idx) {
        let Some(member) = corpus.get(m) else { continue };
        let mut gap_base: Vec<usize> = Vec::new();
        let mut gap_member: Vec<usize> = Vec::new();
        let mut anchor: Option<usize> = None;

        for op in edit_script(base.blocks(), member.blocks()) {
            match op {
                AlignOp::OnlyA(a) => gap_base.push(a),
                AlignOp::OnlyB(b) => gap_member.push(b),
                AlignOp::Match { a, b } => {
                    flush_gap(
                        m,
                        &mut gap_base,
                        &mut gap_member,
                        &mut anchor,
                        &mut slots,
                        &mut leading,
                    );
                    slots[a].observed.push(BlockRef::new(m, b));
                    anchor = Some(a);
                }
            }
        }
        flush_gap(
            m,
            &mut gap_base,
            &mut gap_member,
            &mut anchor,
            &mut slots,
            &mut leading,
        );
    }

    let mut blocks = Vec::with_capacity(slots.len());
    for (position, slot) in slots.into_iter().enumerate() {
        let Some(canonical) = base.block(position) else { continue };
        let mut absent = slot.absent;
        absent.sort_unstable();
        blocks.push(CanonicalBlock {
            position,
            kind: canonical.kind,
            canonical_text: canonical.normalized.clone(),
            variants: group_variants(&slot.observed, corpus),
            absent_from: ids(&absent, corpus),
            insertions: group_variants(&slot.inserted, corpus),
        });
    }

    let result = CanonicalResult {
        cluster_id: cluster.id,
        canonical_id: base.id().to_string(),
        members: ids(&cluster.members, corpus),
        leading_insertions: group_variants(&leading, corpus),
        blocks,
    };
    debug!(
        cluster = cluster.id,
        canonical = %result.canonical_id,
        divergent = result.divergent_blocks().count(),
        "cluster merged"
    );
    Ok(result)
}

/// Pair unmatched base and member blocks between two anchors. Extra base
/// blocks mark the member absent; extra member blocks become insertions
/// after the nearest preceding base position.
fn flush_gap(
    member: usize,
    gap_base: &mut Vec<usize>,
    gap_member: &mut Vec<usize>,
    anchor: &mut Option<usize>,
    slots: &mut [Slot],
    leading: &mut Vec<BlockRef>,
) {
    let paired = gap_base.len().min(gap_member.len());
    for (&a, &b) in gap_base.iter().zip(gap_member.iter()) {
        slots[a].observed.push(BlockRef::new(member, b));
    }
    for &a in &gap_base[paired..] {
        slots[a].absent.push(member);
    }
    if let Some(&last) = gap_base.last() {
        *anchor = Some(last);
    }
    for &b in &gap_member[paired..] {
        let r = BlockRef::new(member, b);
        match *anchor {
            Some(a) => slots[a].inserted.push(r),
            None => leading.push(r),
        }
    }
    gap_base.clear();
    gap_member.clear();
}

/// Group observations by (kind, normalized text) in first-seen order.
fn group_variants(refs: &[BlockRef], corpus: &Corpus) -> Vec<Variant> {
    let mut groups: Vec<(BlockKind, String, Vec<usize>)> = Vec::new();
    for &r in refs {
        let Some(block) = corpus.block(r) else { continue };
        match groups
            .iter_mut()
            .find(|(k, t, _)| *k == block.kind && *t == block.normalized)
        {
            Some((_, _, docs)) => {
                if !docs.contains(&r.doc) {
                    docs.push(r.doc);
                }
            }
            None => groups.push((block.kind, block.normalized.clone(), vec![r.doc])),
        }
    }
    groups
        .into_iter()
        .map(|(kind, text, mut docs)| {
            docs.sort_unstable();
            Variant {
                kind,
                text,
                members: ids(&docs, corpus),
            }
        })
        .collect()
}

fn ids(indices: &[usize], corpus: &Corpus) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&i| corpus.get(i).map(|d| d.id().to_string()))
        .collect()
}
