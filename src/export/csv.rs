//! Edge list output.
//!
//! Each [`EdgeRecord`] is expanded into `count` identical `src,dst` lines. Every
//! line is encoded on its own and flushed as soon as it is written, so the
//! output only ever holds whole lines, unless a write is torn part way through,
//! in which case writing stops.

use crate::core::element::EdgeRecord;
use crate::core::ids::NodeId;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to open `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write edge {src},{dst}: {source}")]
    Line {
        src: NodeId,
        dst: NodeId,
        #[source]
        source: io::Error,
    },
    /// Part of the line reached the output before the failure. Later lines
    /// would be glued onto the fragment, so this is never skipped.
    #[error("edge {src},{dst} was torn after {written} bytes: {source}")]
    TornLine {
        src: NodeId,
        dst: NodeId,
        written: usize,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    /// Whether the output is still line-aligned after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WriteError::Line { .. })
    }
}

/// What [`EdgeListWriter::write_all`] does when a line cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Stop at the first failed line and return its error.
    #[default]
    Abort,
    /// Record lines that failed cleanly and keep going. A torn line still
    /// stops the run.
    Collect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedLine {
    pub src: NodeId,
    pub dst: NodeId,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct WriteReport {
    pub lines_written: u64,
    pub failed: Vec<FailedLine>,
}

pub struct EdgeListWriter<W: Write> {
    out: W,
}

impl EdgeListWriter<File> {
    /// Opens `path` for appending, creating it if missing.
    pub fn append(path: &Path) -> Result<Self, WriteError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| WriteError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file))
    }
}

fn encode_line(src: NodeId, dst: NodeId) -> Result<Vec<u8>, csv::Error> {
    let mut encoder = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::with_capacity(24));
    encoder.write_record([src.to_string(), dst.to_string()])?;
    encoder
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

impl<W: Write> EdgeListWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, src: NodeId, dst: NodeId) -> Result<(), WriteError> {
        let line = encode_line(src, dst).map_err(|e| WriteError::Line {
            src,
            dst,
            source: e.into(),
        })?;

        let mut written = 0;
        while written < line.len() {
            match self.out.write(&line[written..]) {
                Ok(0) => {
                    return Err(line_failure(
                        src,
                        dst,
                        written,
                        io::Error::from(io::ErrorKind::WriteZero),
                    ));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(line_failure(src, dst, written, e)),
            }
        }
        // a failed flush may still deliver the buffered line later
        self.out
            .flush()
            .map_err(|e| line_failure(src, dst, written, e))
    }

    /// Writes `record.count` lines for one edge and returns how many were written.
    pub fn write_record(&mut self, record: &EdgeRecord) -> Result<u64, WriteError> {
        for _ in 0..record.count {
            self.write_line(record.src, record.dst)?;
        }
        Ok(record.count)
    }

    pub fn write_all<I>(&mut self, edges: I, policy: WritePolicy) -> Result<WriteReport, WriteError>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        let mut report = WriteReport::default();
        for record in edges {
            match policy {
                WritePolicy::Abort => report.lines_written += self.write_record(&record)?,
                WritePolicy::Collect => {
                    for _ in 0..record.count {
                        match self.write_line(record.src, record.dst) {
                            Ok(()) => report.lines_written += 1,
                            Err(err) if err.is_recoverable() => {
                                warn!(error = %err, "skipping edge line");
                                report.failed.push(FailedLine {
                                    src: record.src,
                                    dst: record.dst,
                                    reason: err.to_string(),
                                });
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn line_failure(src: NodeId, dst: NodeId, written: usize, source: io::Error) -> WriteError {
    if written == 0 {
        WriteError::Line { src, dst, source }
    } else {
        WriteError::TornLine {
            src,
            dst,
            written,
            source,
        }
    }
}

/// Writes to a primary sink and echoes to a best-effort secondary one.
///
/// Errors from the primary sink are returned. The first echo error is logged
/// and the echo is switched off; the primary output carries on.
pub struct Tee<A, B> {
    first: A,
    second: B,
    echo_failed: bool,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            echo_failed: false,
        }
    }

    fn echo(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            warn!(error = %err, "echo output failed; continuing without it");
            self.echo_failed = true;
        }
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.first.write(buf)?;
        if !self.echo_failed {
            let echoed = self.second.write_all(&buf[..n]);
            self.echo(echoed);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        if !self.echo_failed {
            let flushed = self.second.flush();
            self.echo(flushed);
        }
        Ok(())
    }
}
