use crate::core::element::{EdgeRecord, GraphElement};
use crate::core::ids::NodeId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by a [`GraphStore`] while ingesting or querying.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity {id} is outside the store capacity of {capacity} entities")]
    VertexOutOfRange { id: NodeId, capacity: u64 },
    #[error("count for edge {src}->{dst} overflowed")]
    EdgeCountOverflow { src: NodeId, dst: NodeId },
    #[error("count for entity {id} overflowed")]
    EntityCountOverflow { id: NodeId },
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub entities: u64,
    pub edges: u64,
}

impl IngestStats {
    pub fn elements(&self) -> u64 {
        self.entities + self.edges
    }
}

/// Bulk ingestion and edge queries over a graph backend.
///
/// Repeated edges are coalesced by the store: querying returns one
/// [`EdgeRecord`] per (src, dst) pair whose `count` is the number of times the
/// pair was ingested.
pub trait GraphStore {
    type Edges<'a>: Iterator<Item = EdgeRecord>
    where
        Self: 'a;

    fn ingest<I>(&mut self, elements: I) -> Result<IngestStats, StoreError>
    where
        I: IntoIterator<Item = GraphElement>;

    fn all_edges(&self) -> Result<Self::Edges<'_>, StoreError>;
}

/// In-memory edge store keeping coalesced edges in columns sorted by (src, dst).
pub struct MemoryStore {
    capacity: u64,
    srcs: Vec<NodeId>,
    dsts: Vec<NodeId>,
    counts: Vec<u64>,
    entities: HashMap<NodeId, u64>,
}

impl MemoryStore {
    /// Creates a store accepting entity ids in `0..capacity`.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            srcs: vec![],
            dsts: vec![],
            counts: vec![],
            entities: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn distinct_edge_count(&self) -> usize {
        self.srcs.len()
    }

    pub fn total_edge_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct entities declared so far.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_declarations(&self, id: NodeId) -> u64 {
        self.entities.get(&id).copied().unwrap_or(0)
    }

    pub fn edges_from(&'_ self, src: NodeId) -> EdgeIter<'_> {
        let start = self.srcs.partition_point(|s| *s < src);
        let end = self.srcs.partition_point(|s| *s <= src);
        EdgeIter::new(self, start, end)
    }

    /// Number of distinct destinations reachable from `src`.
    pub fn out_degree(&self, src: NodeId) -> usize {
        self.edges_from(src).len()
    }

    fn check_vertex(&self, id: NodeId) -> Result<(), StoreError> {
        if u64::from(id) >= self.capacity {
            return Err(StoreError::VertexOutOfRange {
                id,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Merges sorted `(key, count)` runs into the existing columns, producing
    /// fresh columns so a failure leaves the store untouched.
    fn merge_runs(&self, runs: &[(u64, u64)]) -> Result<Columns, StoreError> {
        let mut merged = Columns::with_capacity(self.srcs.len() + runs.len());
        let mut i = 0;
        let mut j = 0;
        while i < self.srcs.len() || j < runs.len() {
            let existing = (i < self.srcs.len()).then(|| edge_key(self.srcs[i], self.dsts[i]));
            let incoming = runs.get(j).map(|(key, _)| *key);
            match (existing, incoming) {
                (Some(a), Some(b)) if a == b => {
                    let count = self.counts[i].checked_add(runs[j].1).ok_or(
                        StoreError::EdgeCountOverflow {
                            src: self.srcs[i],
                            dst: self.dsts[i],
                        },
                    )?;
                    merged.push(a, count);
                    i += 1;
                    j += 1;
                }
                (Some(a), Some(b)) if b < a => {
                    merged.push(b, runs[j].1);
                    j += 1;
                }
                (Some(a), _) => {
                    merged.push(a, self.counts[i]);
                    i += 1;
                }
                (None, Some(b)) => {
                    merged.push(b, runs[j].1);
                    j += 1;
                }
                (None, None) => break,
            }
        }
        Ok(merged)
    }
}

impl GraphStore for MemoryStore {
    type Edges<'a> = EdgeIter<'a>;

    fn ingest<I>(&mut self, elements: I) -> Result<IngestStats, StoreError>
    where
        I: IntoIterator<Item = GraphElement>,
    {
        let mut stats = IngestStats::default();
        let mut keys = vec![];
        let mut declared: HashMap<NodeId, u64> = HashMap::new();

        for element in elements {
            match element {
                GraphElement::Entity(id) => {
                    self.check_vertex(id)?;
                    *declared.entry(id).or_insert(0) += 1;
                    stats.entities += 1;
                }
                GraphElement::Edge(edge) => {
                    self.check_vertex(edge.src)?;
                    self.check_vertex(edge.dst)?;
                    keys.push(edge_key(edge.src, edge.dst));
                    stats.edges += 1;
                }
            }
        }

        keys.sort_unstable();
        let runs = run_lengths(&keys);
        let merged = self.merge_runs(&runs)?;

        let mut entity_updates = Vec::with_capacity(declared.len());
        for (id, added) in declared {
            let total = self
                .entity_declarations(id)
                .checked_add(added)
                .ok_or(StoreError::EntityCountOverflow { id })?;
            entity_updates.push((id, total));
        }

        self.srcs = merged.srcs;
        self.dsts = merged.dsts;
        self.counts = merged.counts;
        self.entities.extend(entity_updates);
        Ok(stats)
    }

    fn all_edges(&self) -> Result<Self::Edges<'_>, StoreError> {
        Ok(EdgeIter::new(self, 0, self.srcs.len()))
    }
}

struct Columns {
    srcs: Vec<NodeId>,
    dsts: Vec<NodeId>,
    counts: Vec<u64>,
}

impl Columns {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            srcs: Vec::with_capacity(capacity),
            dsts: Vec::with_capacity(capacity),
            counts: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, key: u64, count: u64) {
        let (src, dst) = split_key(key);
        self.srcs.push(src);
        self.dsts.push(dst);
        self.counts.push(count);
    }
}

fn edge_key(src: NodeId, dst: NodeId) -> u64 {
    (u64::from(src) << NodeId::BITS) | u64::from(dst)
}

fn split_key(key: u64) -> (NodeId, NodeId) {
    ((key >> NodeId::BITS) as NodeId, key as NodeId)
}

// keys must be sorted
fn run_lengths(keys: &[u64]) -> Vec<(u64, u64)> {
    let mut runs: Vec<(u64, u64)> = vec![];
    for key in keys {
        match runs.last_mut() {
            Some((last, count)) if last == key => *count += 1,
            _ => runs.push((*key, 1)),
        }
    }
    runs
}

pub struct EdgeIter<'a> {
    store: &'a MemoryStore,
    start: usize,
    end: usize,
    next: usize,
}

impl<'a> EdgeIter<'a> {
    fn new(store: &'a MemoryStore, start: usize, end: usize) -> Self {
        Self {
            store,
            start,
            end,
            next: 0,
        }
    }
}

impl<'a> Iterator for EdgeIter<'a> {
    type Item = EdgeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start + self.next < self.end {
            let idx = self.start + self.next;
            let result = Some(EdgeRecord::new(
                self.store.srcs[idx],
                self.store.dsts[idx],
                self.store.counts[idx],
            ));
            self.next += 1;
            result
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EdgeIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::EdgeCandidate;

    fn edge(src: NodeId, dst: NodeId) -> GraphElement {
        GraphElement::Edge(EdgeCandidate::new(src, dst))
    }

    #[test]
    fn test_no_edges() {
        let store = MemoryStore::new(2);

        assert_eq!(0, store.distinct_edge_count());
        assert_eq!(0, store.all_edges().unwrap().count());
        assert_eq!(0, store.edges_from(0).count());
        assert_eq!(0, store.edges_from(1).count());
    }

    #[test]
    fn test_single_edge() {
        let mut store = MemoryStore::new(2);
        let stats = store.ingest([edge(0, 1)]).unwrap();

        assert_eq!(IngestStats { entities: 0, edges: 1 }, stats);
        assert_eq!(Some(EdgeRecord::new(0, 1, 1)), store.edges_from(0).next());
        assert_eq!(None, store.edges_from(1).next());
    }

    #[test]
    fn test_duplicates_coalesce_into_count() {
        let mut store = MemoryStore::new(8);
        let mut elements = vec![edge(3, 7); 5];
        elements.push(edge(7, 3));
        elements.push(edge(3, 7));
        store.ingest(elements).unwrap();

        let edges = store.all_edges().unwrap().collect::<Vec<_>>();
        assert_eq!(
            vec![EdgeRecord::new(3, 7, 6), EdgeRecord::new(7, 3, 1)],
            edges
        );
        assert_eq!(7, store.total_edge_count());
    }

    #[test]
    fn test_edges_sorted_by_source_then_destination() {
        let mut store = MemoryStore::new(3);
        store
            .ingest([edge(0, 2), edge(2, 0), edge(0, 1), edge(1, 2)])
            .unwrap();

        let mut iter = store.all_edges().unwrap();
        assert_eq!(Some(EdgeRecord::new(0, 1, 1)), iter.next());
        assert_eq!(Some(EdgeRecord::new(0, 2, 1)), iter.next());
        assert_eq!(Some(EdgeRecord::new(1, 2, 1)), iter.next());
        assert_eq!(Some(EdgeRecord::new(2, 0, 1)), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(2, store.out_degree(0));
        assert_eq!(1, store.out_degree(1));
    }

    #[test]
    fn test_repeated_ingest_merges_counts() {
        let mut store = MemoryStore::new(4);
        store.ingest([edge(1, 1), edge(2, 3)]).unwrap();
        store.ingest([edge(0, 0), edge(2, 3), edge(3, 3)]).unwrap();

        let edges = store.all_edges().unwrap().collect::<Vec<_>>();
        assert_eq!(
            vec![
                EdgeRecord::new(0, 0, 1),
                EdgeRecord::new(1, 1, 1),
                EdgeRecord::new(2, 3, 2),
                EdgeRecord::new(3, 3, 1),
            ],
            edges
        );
    }

    #[test]
    fn test_entities_are_counted() {
        let mut store = MemoryStore::new(4);
        let stats = store
            .ingest([
                GraphElement::Entity(1),
                edge(1, 2),
                GraphElement::Entity(2),
                GraphElement::Entity(1),
            ])
            .unwrap();

        assert_eq!(IngestStats { entities: 3, edges: 1 }, stats);
        assert_eq!(4, stats.elements());
        assert_eq!(2, store.entity_count());
        assert_eq!(2, store.entity_declarations(1));
        assert_eq!(0, store.entity_declarations(3));
    }

    #[test]
    fn test_out_of_range_leaves_store_unchanged() {
        let mut store = MemoryStore::new(4);
        store.ingest([edge(0, 1)]).unwrap();

        let err = store
            .ingest([edge(0, 1), GraphElement::Entity(2), edge(1, 4)])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VertexOutOfRange { id: 4, capacity: 4 }
        ));
        assert_eq!(vec![EdgeRecord::new(0, 1, 1)], store.all_edges().unwrap().collect::<Vec<_>>());
        assert_eq!(0, store.entity_count());
    }

    #[test]
    fn test_key_round_trip_keeps_high_ids() {
        let key = edge_key(NodeId::MAX, 7);
        assert_eq!((NodeId::MAX, 7), split_key(key));
    }
}
