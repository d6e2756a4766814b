// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for corpus loading, scanning and output.
//!
//! Two layers. [`CorpusError`] covers everything that can go wrong between the
//! three binary files and a resolved member slice. [`EngineError`] wraps it and
//! adds the failures that belong to a run: sinks, configuration, the worker
//! pool, and the CSV preparation tool.
//!
//! Severity is decided by the caller, not the type. `Open`, `Map` and
//! `Misaligned` abort a run before any worker starts. `OutOfRange` met while
//! scanning is a per-anchor skip; see [`CorpusError::is_skippable`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot open corpus file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot map corpus file {}: {source}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corpus file {} is {len} bytes, not a whole number of 32-bit words", path.display())]
    Misaligned { path: PathBuf, len: usize },

    #[error("set {set_id} has no usable offset entry")]
    OutOfRange { set_id: u32 },

    #[error("set {set_id} is not in the identifier list")]
    UnknownSet { set_id: u32 },

    #[error("anchor index {index} is past the end of the identifier list ({len} sets)")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl CorpusError {
    /// Errors a scan logs and steps over instead of stopping for.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CorpusError::OutOfRange { .. } | CorpusError::UnknownSet { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("cannot write suggestions to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot start worker pool: {0}")]
    ThreadPool(String),

    #[error("membership CSV line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
