//! Synthetic R-MAT graph generation, loading and edge list export.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod pipeline;
