//! End-to-end runs over corpora on disk.

use std::fs;

use suggestomatic::{
    CancellationToken, CompareWindow, EngineError, RunConfig, Scheduler, ScoreMode, Selection,
    SetStore,
};

use crate::common::{corpus_on_disk, parse_output, run_rows, store_from_sets, THREE_SETS};

#[test]
fn test_three_set_example_end_to_end() {
    let (dir, paths) = corpus_on_disk(THREE_SETS);
    let store = SetStore::open(&paths).unwrap();
    let out = dir.path().join("suggestions.csv");
    let config = RunConfig {
        workers: 1,
        ..RunConfig::default()
    };

    let report = Scheduler::new(&store, &config).run(&out).unwrap();

    assert!(report.is_success());
    assert_eq!(fs::read_to_string(&out).unwrap(), "1,2,2\n");
    assert_eq!(report.suggestions_written(), 1);
    assert_eq!(report.anchors_processed(), 3);
}

#[test]
fn test_fraction_output_has_six_decimals() {
    let (dir, paths) = corpus_on_disk(&[(1, &[1, 2, 3]), (2, &[1, 9]), (3, &[7])]);
    let store = SetStore::open(&paths).unwrap();
    let out = dir.path().join("out.csv");
    let config = RunConfig {
        workers: 1,
        mode: ScoreMode::Fraction,
        threshold: 0.3,
        ..RunConfig::default()
    };

    Scheduler::new(&store, &config).run(&out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "1,2,0.333333\n");
}

#[test]
fn test_multi_worker_files_are_named_by_worker() {
    let store = store_from_sets(&[(1, &[1, 2]), (2, &[2, 3]), (3, &[3, 4]), (4, &[4, 5])]);
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        workers: 3,
        ..RunConfig::default()
    };

    let (report, rows) = run_rows(&store, &config, dir.path());

    let mut names: Vec<String> = report
        .outputs()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["suggestions-0.csv", "suggestions-1.csv", "suggestions-2.csv"]);
    assert_eq!(rows, vec![(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)]);
}

#[test]
fn test_resume_with_begin_at_appends() {
    let store = store_from_sets(&[(1, &[1, 2]), (2, &[1, 2]), (3, &[2]), (4, &[2])]);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    // Pretend an earlier run already covered anchors 2 and 3.
    let full = RunConfig {
        workers: 1,
        ..RunConfig::default()
    };
    let tail_only = RunConfig {
        begin_at: 2,
        ..full.clone()
    };
    Scheduler::new(&store, &tail_only).run(&out).unwrap();
    let tail = fs::read_to_string(&out).unwrap();
    assert_eq!(tail, "3,4,1\n");

    // A fresh run from the start extends the same file.
    Scheduler::new(&store, &full).run(&out).unwrap();
    let rows = parse_output(&fs::read_to_string(&out).unwrap());
    assert_eq!(rows.first(), Some(&(3, 4, 1.0)));
    assert!(rows.contains(&(1, 2, 2.0)));
    assert_eq!(rows.iter().filter(|r| **r == (3, 4, 1.0)).count(), 2);
}

#[test]
fn test_unresolvable_anchor_is_skipped_and_counted() {
    // Set 2's offset points past the blob; set 1 ends where set 2 starts, so
    // both fail to resolve. Set 3 and 4 are fine.
    let store = SetStore::from_words(
        vec![1, 2, 3, 4],
        vec![0, 0, 4000, 8, 12],
        vec![5, 6, 5, 5],
    );
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        workers: 2,
        ..RunConfig::default()
    };

    let (report, rows) = run_rows(&store, &config, dir.path());

    assert!(report.is_success());
    assert_eq!(report.anchors_skipped(), 2);
    assert_eq!(report.anchors_processed(), 2);
    assert_eq!(rows, vec![(3, 4, 1.0)]);
}

#[test]
fn test_early_exit_caps_rows_per_anchor() {
    let sets: Vec<(u32, Vec<u32>)> = (1..=20).map(|id| (id, vec![1, 2, 3])).collect();
    let borrowed: Vec<(u32, &[u32])> = sets.iter().map(|(i, m)| (*i, m.as_slice())).collect();
    let store = store_from_sets(&borrowed);
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        workers: 4,
        selection: Selection::EarlyExit { max_accepted: 5 },
        ..RunConfig::default()
    };

    let (report, rows) = run_rows(&store, &config, dir.path());

    for anchor in 1..=20u32 {
        let per_anchor = rows.iter().filter(|r| r.0 == anchor).count();
        assert_eq!(per_anchor, 5usize.min(20 - anchor as usize), "anchor {}", anchor);
        // Sequential scan: the first five following sets.
        let candidates: Vec<u32> = rows.iter().filter(|r| r.0 == anchor).map(|r| r.1).collect();
        let expected: Vec<u32> = (anchor + 1..=20).take(5).collect();
        assert_eq!(candidates, expected);
    }
    assert_eq!(report.suggestions_written(), rows.len());
}

#[test]
fn test_all_except_self_is_symmetric_in_absolute_mode() {
    let store = store_from_sets(&[(1, &[1, 2, 3]), (2, &[2, 3]), (3, &[9])]);
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        workers: 2,
        window: CompareWindow::AllExceptSelf,
        ..RunConfig::default()
    };

    let (_, rows) = run_rows(&store, &config, dir.path());
    assert_eq!(rows, vec![(1, 2, 2.0), (2, 1, 2.0)]);
}

#[test]
fn test_cancelled_run_still_flushes_outputs() {
    let sets: Vec<(u32, Vec<u32>)> = (1..=400).map(|id| (id, (1..=50).collect())).collect();
    let borrowed: Vec<(u32, &[u32])> = sets.iter().map(|(i, m)| (*i, m.as_slice())).collect();
    let store = store_from_sets(&borrowed);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let config = RunConfig {
        workers: 2,
        ..RunConfig::default()
    };

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = Scheduler::new(&store, &config)
        .with_cancellation(cancel)
        .run(&out)
        .unwrap();

    assert!(report.is_success());
    assert!(report.was_cancelled());
    for worker in &report.workers {
        assert!(worker.output.exists());
    }
}

#[test]
fn test_config_file_drives_run() {
    let (dir, paths) = corpus_on_disk(THREE_SETS);
    let config_path = dir.path().join("run.json");
    fs::write(
        &config_path,
        r#"{ "workers": 1, "window": "all-except-self", "mode": "fraction", "threshold": 0.5 }"#,
    )
    .unwrap();

    let config = RunConfig::from_json_file(&config_path).unwrap();
    let store = SetStore::open(&paths).unwrap();
    let out = dir.path().join("out.csv");
    Scheduler::new(&store, &config).run(&out).unwrap();

    let rows = parse_output(&fs::read_to_string(&out).unwrap());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| (r.2 - 2.0 / 3.0).abs() < 1e-6));
}

#[test]
fn test_bad_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.json");
    fs::write(&config_path, r#"{ "workers": "many" }"#).unwrap();
    assert!(matches!(
        RunConfig::from_json_file(&config_path),
        Err(EngineError::InvalidConfig(_))
    ));
    assert!(matches!(
        RunConfig::from_json_file(&dir.path().join("missing.json")),
        Err(EngineError::InputRead { .. })
    ));
}
