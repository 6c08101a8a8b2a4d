use crate::core::element::EdgeRecord;
use crate::core::ids::NodeId;
use std::collections::HashMap;

/// Degree statistics over a set of stored edges, weighted by edge count.
#[derive(Debug, Default, PartialEq)]
pub struct DegreeSummary {
    pub sources: usize,
    pub destinations: usize,
    pub distinct_edges: u64,
    pub total_edges: u64,
    pub max_out_degree: u64,
    pub max_in_degree: u64,
    pub mean_out_degree: f64,
}

pub fn degree_summary<I>(edges: I) -> DegreeSummary
where
    I: IntoIterator<Item = EdgeRecord>,
{
    let mut out_deg: HashMap<NodeId, u64> = HashMap::new();
    let mut in_deg: HashMap<NodeId, u64> = HashMap::new();
    let mut summary = DegreeSummary::default();

    for edge in edges {
        *out_deg.entry(edge.src).or_insert(0) += edge.count;
        *in_deg.entry(edge.dst).or_insert(0) += edge.count;
        summary.distinct_edges += 1;
        summary.total_edges += edge.count;
    }

    summary.sources = out_deg.len();
    summary.destinations = in_deg.len();
    summary.max_out_degree = out_deg.values().copied().max().unwrap_or(0);
    summary.max_in_degree = in_deg.values().copied().max().unwrap_or(0);
    if summary.sources > 0 {
        summary.mean_out_degree = summary.total_edges as f64 / summary.sources as f64;
    }
    summary
}
