//! Loading corpus files from disk, including malformed ones.

use std::fs;

use suggestomatic::{CorpusError, CorpusPaths, SetStore};

use crate::common::{corpus_on_disk, THREE_SETS};

#[test]
fn test_mapped_store_resolves_like_in_memory() {
    let (_dir, paths) = corpus_on_disk(THREE_SETS);
    let store = SetStore::open(&paths).unwrap();

    assert_eq!(store.set_count(), 3);
    assert_eq!(store.set_ids(), &[1, 2, 3]);
    assert_eq!(store.resolve(0).unwrap().members, &[10, 20, 30]);
    assert_eq!(store.resolve(1).unwrap().members, &[20, 30, 40]);
    assert_eq!(store.resolve_by_id(3).unwrap().members, &[50]);
    assert_eq!(store.paths(), Some(&paths));
}

#[test]
fn test_missing_file_is_open_error() {
    let (dir, paths) = corpus_on_disk(THREE_SETS);
    let broken = CorpusPaths {
        set_members: dir.path().join("nope.bin"),
        ..paths
    };
    assert!(matches!(SetStore::open(&broken), Err(CorpusError::Open { .. })));
}

#[test]
fn test_truncated_file_is_misaligned() {
    let (_dir, paths) = corpus_on_disk(THREE_SETS);
    let mut bytes = fs::read(&paths.set_members).unwrap();
    bytes.pop();
    fs::write(&paths.set_members, &bytes).unwrap();

    assert!(matches!(
        SetStore::open(&paths),
        Err(CorpusError::Misaligned { .. })
    ));
}

#[test]
fn test_empty_files_load_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let paths = CorpusPaths::in_dir(dir.path());
    for path in [&paths.set_ids, &paths.set_index, &paths.set_members] {
        fs::write(path, b"").unwrap();
    }
    let store = SetStore::open(&paths).unwrap();
    assert_eq!(store.set_count(), 0);
    assert!(store.resolve(0).is_err());
}

#[test]
fn test_sentinel_terminated_corpus() {
    // Older generators wrote a 0 after every member array.
    let dir = tempfile::tempdir().unwrap();
    let paths = CorpusPaths::in_dir(dir.path());
    let ids: [u32; 2] = [5, 9];
    let mut index = [0u32; 10];
    index[9] = 16;
    let members: [u32; 7] = [1, 2, 3, 0, 2, 3, 0];
    fs::write(&paths.set_ids, bytemuck::cast_slice::<u32, u8>(&ids)).unwrap();
    fs::write(&paths.set_index, bytemuck::cast_slice::<u32, u8>(&index)).unwrap();
    fs::write(&paths.set_members, bytemuck::cast_slice::<u32, u8>(&members)).unwrap();

    let store = SetStore::open(&paths).unwrap();
    assert_eq!(store.resolve(0).unwrap().members, &[1, 2, 3]);
    assert_eq!(store.resolve(1).unwrap().members, &[2, 3]);
}

#[test]
fn test_fingerprint_tracks_content() {
    let (_a, first) = corpus_on_disk(THREE_SETS);
    let (_b, second) = corpus_on_disk(&[(1, &[10, 20, 31]), (2, &[20, 30, 40]), (3, &[50])]);
    let (_c, again) = corpus_on_disk(THREE_SETS);

    let fp = |paths: &CorpusPaths| SetStore::open(paths).unwrap().fingerprint();
    assert_eq!(fp(&first), fp(&again));
    assert_ne!(fp(&first).set_members, fp(&second).set_members);
    assert_eq!(fp(&first).set_ids, fp(&second).set_ids);
}
