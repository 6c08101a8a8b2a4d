//! The generate → ingest → query → write batch.

use crate::analysis::degree::{DegreeSummary, degree_summary};
use crate::core::graph::{GraphStore, IngestStats};
use crate::core::memory::estimate_edge_memory;
use crate::error::RunError;
use crate::export::csv::{EdgeListWriter, Tee, WritePolicy, WriteReport};
use crate::ingest::synthetic::{GenerationRequest, generate_seeded};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub request: GenerationRequest,
    /// Seed for the generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub policy: WritePolicy,
}

#[derive(Debug)]
pub struct RunSummary {
    pub ingested: IngestStats,
    pub degrees: DegreeSummary,
    pub report: WriteReport,
}

/// Generates the graph described by `cfg`, loads it into `store` and writes
/// every stored edge, expanded by its count, to `writer`.
#[instrument(
    skip_all,
    fields(
        entities = cfg.request.entity_count(),
        edges = cfg.request.edge_count(),
        seed = ?cfg.seed,
    )
)]
pub fn run<S, W>(
    cfg: &RunConfig,
    store: &mut S,
    writer: &mut EdgeListWriter<W>,
) -> Result<RunSummary, RunError>
where
    S: GraphStore,
    W: Write,
{
    let (a, b, c, d) = cfg.request.probabilities().quadrant_probabilities();
    debug!(a, b, c, d, depth = cfg.request.depth(), "generating R-MAT graph");

    let elements = generate_seeded(&cfg.request, cfg.seed).declaring_entities();
    let ingested = store.ingest(elements)?;
    info!(
        entities = ingested.entities,
        edges = ingested.edges,
        "ingested generated elements"
    );

    let report = writer.write_all(store.all_edges()?, cfg.policy)?;
    if !report.failed.is_empty() {
        warn!(failed = report.failed.len(), "some edge lines were not written");
    }
    info!(lines = report.lines_written, "wrote edge list");

    let degrees = degree_summary(store.all_edges()?);
    let memory = estimate_edge_memory(degrees.distinct_edges as usize);
    info!(
        distinct_edges = degrees.distinct_edges,
        max_out_degree = degrees.max_out_degree,
        max_in_degree = degrees.max_in_degree,
        mean_out_degree = degrees.mean_out_degree,
        approx_memory_mb = memory.bytes / (1024 * 1024),
        "edge degree summary"
    );

    Ok(RunSummary {
        ingested,
        degrees,
        report,
    })
}

/// Runs the batch appending to `path`. With `echo`, every line is also
/// written to stdout. The file is closed when this returns, on success or error.
pub fn run_to_file<S: GraphStore>(
    cfg: &RunConfig,
    store: &mut S,
    path: &Path,
    echo: bool,
) -> Result<RunSummary, RunError> {
    let file = EdgeListWriter::append(path)?.into_inner();
    let out: Box<dyn Write> = if echo {
        Box::new(Tee::new(file, io::stdout().lock()))
    } else {
        Box::new(file)
    };
    let mut writer = EdgeListWriter::new(out);
    run(cfg, store, &mut writer)
}
