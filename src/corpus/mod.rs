// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The set store: three read-only binary files and the slices they describe.
//!
//! # File layout
//!
//! ```text
//! set-ids.bin      [id₀][id₁][id₂]...             u32 per set, list order
//! set-index.bin    [off(0)][off(1)]...[off(max)]   u32 byte offset, indexed BY ID
//! set-members.bin  [members of id₀][members of id₁]...   ascending u32 arrays
//! ```
//!
//! All words are native byte order. A set's extent is not stored anywhere: it
//! runs from its own offset to the offset of the *next identifier in list
//! order*, or to the end of the blob for the last one. Reordering the list
//! changes every length, so the list and the blob must come from the same
//! generator run.
//!
//! Older generators terminated every array with a `0` word. Zero is never a
//! member, so [`SetStore::resolve`] trims trailing zeros and the rest of the
//! engine only ever sees length-bounded, sentinel-free slices.
//!
//! Nothing is copied. Mapped files stay mapped for the life of the store and
//! every [`SetView`] borrows from it.

pub mod prepare;

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rustc_hash::FxHashMap;

use crate::error::CorpusError;

/// Width of one member / offset / identifier word.
pub const WORD_BYTES: usize = std::mem::size_of::<u32>();

/// Locations of the three corpus files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusPaths {
    pub set_ids: PathBuf,
    pub set_index: PathBuf,
    pub set_members: PathBuf,
}

impl CorpusPaths {
    pub fn new(
        set_ids: impl Into<PathBuf>,
        set_index: impl Into<PathBuf>,
        set_members: impl Into<PathBuf>,
    ) -> Self {
        Self {
            set_ids: set_ids.into(),
            set_index: set_index.into(),
            set_members: set_members.into(),
        }
    }

    /// Conventional file names inside one directory (what `prepare` writes).
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join("set-ids.bin"),
            dir.join("set-index.bin"),
            dir.join("set-members.bin"),
        )
    }
}

/// Backing storage for one file's words.
enum Words {
    Empty,
    Mapped(Mmap),
    Owned(Vec<u32>),
}

impl Words {
    fn as_slice(&self) -> &[u32] {
        match self {
            Words::Empty => &[],
            // Alignment and length were checked when the map was created.
            Words::Mapped(map) => bytemuck::try_cast_slice(&map[..]).unwrap_or(&[]),
            Words::Owned(words) => words,
        }
    }

    fn load(path: &Path) -> Result<Self, CorpusError> {
        let file = File::open(path).map_err(|source| CorpusError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| CorpusError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len() as usize;

        if len % WORD_BYTES != 0 {
            return Err(CorpusError::Misaligned {
                path: path.to_path_buf(),
                len,
            });
        }
        if len == 0 {
            return Ok(Words::Empty);
        }

        // SAFETY: the map is read-only and the corpus files are not modified
        // while a run holds them.
        #[allow(unsafe_code)]
        let map = unsafe { Mmap::map(&file) }.map_err(|source| CorpusError::Map {
            path: path.to_path_buf(),
            source,
        })?;

        if bytemuck::try_cast_slice::<u8, u32>(&map[..]).is_err() {
            return Err(CorpusError::Misaligned {
                path: path.to_path_buf(),
                len,
            });
        }

        tracing::debug!(path = %path.display(), bytes = len, "mapped corpus file");
        Ok(Words::Mapped(map))
    }
}

/// One resolved set: where it sits in the list and its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetView<'a> {
    /// Position in the identifier list (the anchor index).
    pub index: usize,
    pub id: u32,
    /// Ascending member ids, sentinel-free.
    pub members: &'a [u32],
}

impl SetView<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// CRC32 of each corpus file, used to tell corpora apart in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorpusFingerprint {
    pub set_ids: u32,
    pub set_index: u32,
    pub set_members: u32,
}

impl fmt::Display for CorpusFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ids={:08x} index={:08x} members={:08x}",
            self.set_ids, self.set_index, self.set_members
        )
    }
}

/// Length distribution over every set in the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorpusStats {
    pub sets: usize,
    pub index_entries: usize,
    pub blob_words: usize,
    pub resolvable: usize,
    pub unresolvable: usize,
    pub empty: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    /// Sets longer than the threshold passed to [`SetStore::stats`].
    pub oversized: usize,
}

/// The immutable, shared corpus.
pub struct SetStore {
    ids: Words,
    index: Words,
    blob: Words,
    positions: FxHashMap<u32, usize>,
    paths: Option<CorpusPaths>,
}

impl fmt::Debug for SetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetStore")
            .field("sets", &self.set_count())
            .field("index_entries", &self.index_words().len())
            .field("blob_words", &self.blob_words().len())
            .field("paths", &self.paths)
            .finish()
    }
}

impl SetStore {
    /// Map the three corpus files read-only.
    ///
    /// Fails with `Open`, `Map` or `Misaligned`; all three are fatal for a run.
    pub fn open(paths: &CorpusPaths) -> Result<Self, CorpusError> {
        let ids = Words::load(&paths.set_ids)?;
        let index = Words::load(&paths.set_index)?;
        let blob = Words::load(&paths.set_members)?;

        let mut store = Self::assemble(ids, index, blob);
        store.paths = Some(paths.clone());

        tracing::info!(
            sets = store.set_count(),
            index_entries = store.index_words().len(),
            blob_bytes = store.blob_bytes(),
            "corpus loaded"
        );
        Ok(store)
    }

    /// Build a store over words already in memory.
    pub fn from_words(set_ids: Vec<u32>, set_index: Vec<u32>, set_members: Vec<u32>) -> Self {
        Self::assemble(
            Words::Owned(set_ids),
            Words::Owned(set_index),
            Words::Owned(set_members),
        )
    }

    fn assemble(ids: Words, index: Words, blob: Words) -> Self {
        let mut positions =
            FxHashMap::with_capacity_and_hasher(ids.as_slice().len(), Default::default());
        for (position, &id) in ids.as_slice().iter().enumerate() {
            // First occurrence wins if the generator ever repeats an id.
            positions.entry(id).or_insert(position);
        }
        Self {
            ids,
            index,
            blob,
            positions,
            paths: None,
        }
    }

    pub fn paths(&self) -> Option<&CorpusPaths> {
        self.paths.as_ref()
    }

    pub fn set_count(&self) -> usize {
        self.ids.as_slice().len()
    }

    pub fn set_ids(&self) -> &[u32] {
        self.ids.as_slice()
    }

    pub fn set_id(&self, index: usize) -> Option<u32> {
        self.set_ids().get(index).copied()
    }

    pub fn index_words(&self) -> &[u32] {
        self.index.as_slice()
    }

    pub fn blob_words(&self) -> &[u32] {
        self.blob.as_slice()
    }

    fn blob_bytes(&self) -> usize {
        self.blob_words().len() * WORD_BYTES
    }

    /// Byte offset of `set_id`'s first member, checked against the blob.
    fn offset_of(&self, set_id: u32) -> Result<usize, CorpusError> {
        let offset = self
            .index_words()
            .get(set_id as usize)
            .copied()
            .ok_or(CorpusError::OutOfRange { set_id })? as usize;
        if offset % WORD_BYTES != 0 || offset > self.blob_bytes() {
            return Err(CorpusError::OutOfRange { set_id });
        }
        Ok(offset)
    }

    /// Resolve the set at list position `index`.
    pub fn resolve(&self, index: usize) -> Result<SetView<'_>, CorpusError> {
        let ids = self.set_ids();
        let id = *ids.get(index).ok_or(CorpusError::IndexOutOfBounds {
            index,
            len: ids.len(),
        })?;

        let start = self.offset_of(id)?;
        let end = match ids.get(index + 1) {
            Some(&next) => self
                .offset_of(next)
                .map_err(|_| CorpusError::OutOfRange { set_id: id })?,
            None => self.blob_bytes(),
        };
        if end < start {
            return Err(CorpusError::OutOfRange { set_id: id });
        }

        let mut members = &self.blob_words()[start / WORD_BYTES..end / WORD_BYTES];
        while let [rest @ .., 0] = members {
            members = rest;
        }

        Ok(SetView { index, id, members })
    }

    /// Resolve a set by its identifier value.
    pub fn resolve_by_id(&self, set_id: u32) -> Result<SetView<'_>, CorpusError> {
        let index = *self
            .positions
            .get(&set_id)
            .ok_or(CorpusError::UnknownSet { set_id })?;
        self.resolve(index)
    }

    /// List position of `set_id`, if present.
    pub fn position_of(&self, set_id: u32) -> Option<usize> {
        self.positions.get(&set_id).copied()
    }

    pub fn fingerprint(&self) -> CorpusFingerprint {
        let crc = |words: &[u32]| crc32fast::hash(bytemuck::cast_slice(words));
        CorpusFingerprint {
            set_ids: crc(self.set_ids()),
            set_index: crc(self.index_words()),
            set_members: crc(self.blob_words()),
        }
    }

    /// Length distribution; `oversized_above` is usually the filter threshold.
    pub fn stats(&self, oversized_above: usize) -> CorpusStats {
        let mut stats = CorpusStats {
            sets: self.set_count(),
            index_entries: self.index_words().len(),
            blob_words: self.blob_words().len(),
            min_len: usize::MAX,
            ..CorpusStats::default()
        };
        let mut total = 0usize;

        for index in 0..self.set_count() {
            match self.resolve(index) {
                Ok(view) => {
                    stats.resolvable += 1;
                    let len = view.len();
                    total += len;
                    stats.min_len = stats.min_len.min(len);
                    stats.max_len = stats.max_len.max(len);
                    if len == 0 {
                        stats.empty += 1;
                    }
                    if len > oversized_above {
                        stats.oversized += 1;
                    }
                }
                Err(_) => stats.unresolvable += 1,
            }
        }

        if stats.resolvable == 0 {
            stats.min_len = 0;
        } else {
            stats.mean_len = total as f64 / stats.resolvable as f64;
        }
        stats
    }

    /// Ids among the first `limit` resolvable sets whose members are not
    /// strictly ascending.
    pub fn unsorted_sets(&self, limit: usize) -> Vec<u32> {
        (0..self.set_count())
            .filter_map(|index| self.resolve(index).ok())
            .take(limit)
            .filter(|view| view.members.windows(2).any(|pair| pair[0] >= pair[1]))
            .map(|view| view.id)
            .collect()
    }
}
