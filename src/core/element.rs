use crate::core::ids::NodeId;

/// One R-MAT sampling trial: a directed (source, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeCandidate {
    pub src: NodeId,
    pub dst: NodeId,
}

impl EdgeCandidate {
    pub fn new(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst }
    }
}

/// Element handed to a [`GraphStore`](crate::core::graph::GraphStore) for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphElement {
    Entity(NodeId),
    Edge(EdgeCandidate),
}

impl GraphElement {
    pub fn as_edge(&self) -> Option<EdgeCandidate> {
        match self {
            GraphElement::Edge(edge) => Some(*edge),
            GraphElement::Entity(_) => None,
        }
    }
}

/// Stored edge as returned by a query. `count` is the number of coalesced trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub src: NodeId,
    pub dst: NodeId,
    pub count: u64,
}

impl EdgeRecord {
    pub fn new(src: NodeId, dst: NodeId, count: u64) -> Self {
        Self { src, dst, count }
    }
}
