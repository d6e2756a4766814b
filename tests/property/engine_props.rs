//! Whole runs against the oracle: worker count, partition and window must
//! never change what gets written.

use proptest::prelude::*;
use suggestomatic::{CompareWindow, Partition, RunConfig, ScoreMode, Selection};

use crate::common::{as_sets, corpus_strategy, run_rows, store_from_sets};
use crate::oracles::oracle_rows;

fn config_strategy() -> impl Strategy<Value = RunConfig> {
    (
        prop_oneof![Just(ScoreMode::Absolute), Just(ScoreMode::Fraction)],
        prop_oneof![
            (1usize..6).prop_map(|n| Selection::TopN { n }),
            (1usize..6).prop_map(|max_accepted| Selection::EarlyExit { max_accepted }),
        ],
        prop_oneof![
            Just(CompareWindow::Following),
            Just(CompareWindow::AllExceptSelf),
            (1usize..4).prop_map(|width| CompareWindow::Windowed { width }),
        ],
        prop_oneof![Just(Partition::Interleaved), Just(Partition::Contiguous)],
        1usize..5,
        0usize..4,
    )
        .prop_map(|(mode, selection, window, partition, workers, begin_at)| {
            let threshold = match mode {
                ScoreMode::Absolute => 1.0,
                ScoreMode::Fraction => 0.25,
            };
            RunConfig {
                mode,
                threshold,
                selection,
                window,
                partition,
                workers,
                begin_at,
                ..RunConfig::default()
            }
        })
}

fn assert_rows_match(got: &[(u32, u32, f64)], expected: &[(u32, u32, f64)]) -> Result<(), TestCaseError> {
    prop_assert_eq!(got.len(), expected.len(), "got {:?}\nexpected {:?}", got, expected);
    for (g, e) in got.iter().zip(expected) {
        prop_assert_eq!((g.0, g.1), (e.0, e.1));
        // Fractions are written with six decimals.
        prop_assert!((g.2 - e.2).abs() < 1e-6, "score {} vs {}", g.2, e.2);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: a run writes exactly the oracle's rows.
    #[test]
    fn prop_run_matches_oracle(corpus in corpus_strategy(), config in config_strategy()) {
        let store = store_from_sets(&as_sets(&corpus));
        let dir = tempfile::tempdir().unwrap();
        let (report, rows) = run_rows(&store, &config, dir.path());

        prop_assert!(report.is_success());
        prop_assert_eq!(
            report.anchors_processed(),
            corpus.len().saturating_sub(config.begin_at)
        );
        assert_rows_match(&rows, &oracle_rows(&corpus, &config))?;
    }

    /// Property: with every anchor forced onto the filter, accepted overlaps
    /// are never below the exact ones and never above the smaller set.
    #[test]
    fn prop_approximate_path_bounds(corpus in corpus_strategy()) {
        let store = store_from_sets(&as_sets(&corpus));
        let exact_config = RunConfig {
            workers: 1,
            selection: Selection::TopN { n: usize::MAX },
            ..RunConfig::default()
        };
        let approx_config = RunConfig {
            filter_threshold: 0,
            filter_bits: 1 << 12,
            ..exact_config.clone()
        };

        let exact_dir = tempfile::tempdir().unwrap();
        let approx_dir = tempfile::tempdir().unwrap();
        let (_, exact) = run_rows(&store, &exact_config, exact_dir.path());
        let (_, approx) = run_rows(&store, &approx_config, approx_dir.path());

        let len_of = |id: u32| corpus.iter().find(|(i, _)| *i == id).map(|(_, m)| m.len()).unwrap();
        for (a, c, score) in &approx {
            prop_assert!(*score <= len_of(*a).min(len_of(*c)) as f64);
        }
        for (a, c, score) in &exact {
            let hit = approx.iter().find(|r| r.0 == *a && r.1 == *c);
            prop_assert!(hit.is_some(), "exact pair ({}, {}) lost on the filter path", a, c);
            prop_assert!(hit.unwrap().2 >= *score);
        }
    }
}
