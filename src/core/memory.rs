use crate::core::ids::NodeId;

pub struct MemoryStats {
    pub edges: usize,
    pub bytes: usize,
}

/// Approximate column footprint of a [`MemoryStore`](crate::core::graph::MemoryStore)
/// holding `edges` distinct edges.
pub fn estimate_edge_memory(edges: usize) -> MemoryStats {
    MemoryStats {
        edges,
        bytes: edges * (2 * size_of::<NodeId>() + size_of::<u64>()),
    }
}
