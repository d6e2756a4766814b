// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Append-only suggestion output.
//!
//! One record per line, `anchor_id,candidate_id,score`. Every worker owns its
//! own sink, so no two writers ever share a file. Writes are buffered;
//! [`ResultSink::finish`] flushes and syncs, and a worker only reports success
//! after it returns.
//!
//! Files are opened for append. Resuming a run with a later `begin_at` extends
//! the previous output instead of truncating it.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::scoring::Suggestion;

/// Anything accepted suggestions can be written to.
pub trait RecordSink {
    fn record(&mut self, suggestion: &Suggestion) -> Result<(), EngineError>;
}

impl RecordSink for Vec<Suggestion> {
    fn record(&mut self, suggestion: &Suggestion) -> Result<(), EngineError> {
        self.push(*suggestion);
        Ok(())
    }
}

/// Output path for `worker` of `workers`.
///
/// A single worker writes to `base` itself. Otherwise the worker index is
/// appended to the file stem: `suggestions.csv` → `suggestions-3.csv`.
pub fn worker_output_path(base: &Path, worker: usize, workers: usize) -> PathBuf {
    if workers <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{}-{}.{}", stem, worker, ext.to_string_lossy()),
        None => format!("{}-{}", stem, worker),
    };
    base.with_file_name(name)
}

/// Buffered CSV writer for one worker.
pub struct ResultSink<W: Write> {
    writer: BufWriter<W>,
    path: PathBuf,
    records: usize,
}

impl ResultSink<File> {
    /// Open `path` for append, creating it if needed.
    pub fn create(path: &Path) -> Result<Self, EngineError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| EngineError::OutputWrite {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file, path))
    }

    pub fn create_for_worker(base: &Path, worker: usize, workers: usize) -> Result<Self, EngineError> {
        Self::create(&worker_output_path(base, worker, workers))
    }

    /// Flush buffered records and sync the file to disk.
    pub fn finish(self) -> Result<usize, EngineError> {
        let path = self.path.clone();
        let records = self.records;
        let file = self.into_inner()?;
        file.sync_all()
            .map_err(|source| EngineError::OutputWrite { path, source })?;
        Ok(records)
    }
}

impl<W: Write> ResultSink<W> {
    /// Wrap any writer; `path` is only used in error messages.
    pub fn new(writer: W, path: impl Into<PathBuf>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            path: path.into(),
            records: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written so far (including ones still buffered).
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> Result<(), EngineError> {
        self.writer.flush().map_err(|source| self.write_error(source))
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, EngineError> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|e| EngineError::OutputWrite {
                path,
                source: e.into_error(),
            })
    }

    fn write_error(&self, source: io::Error) -> EngineError {
        EngineError::OutputWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl<W: Write> RecordSink for ResultSink<W> {
    fn record(&mut self, suggestion: &Suggestion) -> Result<(), EngineError> {
        writeln!(
            self.writer,
            "{},{},{}",
            suggestion.anchor_id, suggestion.candidate_id, suggestion.score
        )
        .map_err(|source| self.write_error(source))?;
        self.records += 1;
        Ok(())
    }
}
