// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turn a membership CSV into the three corpus files.
//!
//! Input is one `member_id,set_id` pair per line, in any order. Sets with too
//! few members are dropped (a one-member set cannot produce a useful
//! suggestion), members are sorted and deduplicated, and the survivors are
//! laid out in ascending id order without terminators.
//!
//! Zero is reserved as padding in the blob. Lines naming member 0 are dropped
//! and counted rather than failing the file.
//!
//! The offset index is sized `max_id + 1` so the largest id has an entry.
//! Ids that never appear get offset 0; they are not in the identifier list,
//! so nothing resolves them.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::corpus::{CorpusPaths, SetStore, WORD_BYTES};
use crate::error::{EngineError, Result};

/// Default: drop sets with one member or fewer.
pub const DEFAULT_SMALL_SET_THRESHOLD: usize = 1;

/// The three corpus files as in-memory words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusWords {
    pub set_ids: Vec<u32>,
    pub set_index: Vec<u32>,
    pub set_members: Vec<u32>,
}

impl CorpusWords {
    /// Lay sets out in the order given. Members are sorted and deduplicated.
    pub fn from_sets<I, M>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, M)>,
        M: IntoIterator<Item = u32>,
    {
        let mut words = CorpusWords::default();
        let mut offsets: Vec<(u32, u32)> = Vec::new();

        for (set_id, members) in sets {
            let mut members: Vec<u32> = members.into_iter().collect();
            members.sort_unstable();
            members.dedup();

            let offset = u32::try_from(words.set_members.len() * WORD_BYTES).map_err(|_| {
                EngineError::InvalidConfig(format!(
                    "membership blob passes 4 GiB before set {}; offsets are 32-bit",
                    set_id
                ))
            })?;
            offsets.push((set_id, offset));
            words.set_ids.push(set_id);
            words.set_members.extend_from_slice(&members);
        }

        let index_len = offsets.iter().map(|&(id, _)| id as usize + 1).max().unwrap_or(0);
        words.set_index = vec![0; index_len];
        for (set_id, offset) in offsets {
            words.set_index[set_id as usize] = offset;
        }
        Ok(words)
    }

    pub fn into_store(self) -> SetStore {
        SetStore::from_words(self.set_ids, self.set_index, self.set_members)
    }

    /// Write all three files, native byte order.
    pub fn write(&self, paths: &CorpusPaths) -> Result<()> {
        write_words(&paths.set_ids, &self.set_ids)?;
        write_words(&paths.set_index, &self.set_index)?;
        write_words(&paths.set_members, &self.set_members)?;
        Ok(())
    }
}

fn write_words(path: &Path, words: &[u32]) -> Result<()> {
    let to_err = |source| EngineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytemuck::cast_slice(words)).map_err(to_err)?;
    writer.flush().map_err(to_err)?;
    Ok(())
}

/// Summary of one `prepare` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareReport {
    pub lines: usize,
    pub sets_seen: usize,
    pub sets_kept: usize,
    pub sets_dropped: usize,
    /// Lines dropped because they named the reserved member id 0.
    pub zero_members_dropped: usize,
    pub members_written: usize,
    pub paths: CorpusPaths,
}

/// Parsed membership CSV.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Membership {
    /// Set id → members, in file order.
    pub sets: BTreeMap<u32, Vec<u32>>,
    /// Non-blank lines read.
    pub lines: usize,
    pub zero_members: usize,
}

/// Parse `member_id,set_id` lines into set id → members.
pub fn read_membership<R: BufRead>(reader: R) -> Result<Membership> {
    let mut membership = Membership::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        membership.lines += 1;

        let (member, set) = trimmed.split_once(',').ok_or_else(|| EngineError::Csv {
            line: line_no,
            reason: "expected `member_id,set_id`".to_string(),
        })?;
        let parse = |field: &str, what: &str| {
            field.trim().parse::<u32>().map_err(|e| EngineError::Csv {
                line: line_no,
                reason: format!("{} `{}`: {}", what, field.trim(), e),
            })
        };
        let member_id = parse(member, "member id")?;
        let set_id = parse(set, "set id")?;
        if member_id == 0 {
            tracing::trace!(line = line_no, set_id, "dropping reserved member id 0");
            membership.zero_members += 1;
            continue;
        }

        membership.sets.entry(set_id).or_default().push(member_id);
    }

    Ok(membership)
}

/// Build and write a corpus from a membership CSV.
pub fn prepare(csv: &Path, output_dir: &Path, small_set_threshold: usize) -> Result<PrepareReport> {
    let file = File::open(csv).map_err(|source| EngineError::InputRead {
        path: csv.to_path_buf(),
        source,
    })?;
    let Membership {
        sets,
        lines,
        zero_members,
    } = read_membership(BufReader::new(file))?;
    let sets_seen = sets.len();
    if zero_members > 0 {
        tracing::warn!(
            csv = %csv.display(),
            lines = zero_members,
            "dropped lines with reserved member id 0"
        );
    }

    let mut dropped = 0;
    let kept: Vec<(u32, Vec<u32>)> = sets
        .into_iter()
        .map(|(set_id, mut members)| {
            members.sort_unstable();
            members.dedup();
            (set_id, members)
        })
        .filter(|(_, members)| {
            let keep = members.len() > small_set_threshold;
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();

    tracing::info!(
        lines,
        sets = sets_seen,
        dropped,
        threshold = small_set_threshold,
        "membership parsed"
    );

    let words = CorpusWords::from_sets(kept)?;
    fs::create_dir_all(output_dir).map_err(|source| EngineError::OutputWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let paths = CorpusPaths::in_dir(output_dir);
    words.write(&paths)?;

    Ok(PrepareReport {
        lines,
        sets_seen,
        sets_kept: words.set_ids.len(),
        sets_dropped: dropped,
        zero_members_dropped: zero_members,
        members_written: words.set_members.len(),
        paths,
    })
}

/// Default output directory name for a CSV: `<stem>-corpus` beside it.
pub fn default_output_dir(csv: &Path) -> PathBuf {
    let stem = csv
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "membership".to_string());
    csv.with_file_name(format!("{}-corpus", stem))
}
