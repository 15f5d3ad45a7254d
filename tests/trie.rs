#![deny(warnings, rust_2018_idioms)]

use drawtree::{Origin, Status, Tree, TreeError};
use rand::rngs::mock::StepRng;

/// Record one run: a sequence of `(width, forced, value)` draws followed by a conclusion.
fn record(
    tree: &mut Tree,
    draws: &[(u8, bool, u64)],
    status: Status,
    origin: Option<Origin>,
) -> Result<(), TreeError> {
    let mut observer = tree.new_observer();
    for &(width, forced, value) in draws {
        observer.draw_bits(width, forced, value)?;
    }
    observer.conclude_test(status, origin)
}

fn free(width: u8, value: u64) -> (u8, bool, u64) {
    (width, false, value)
}

fn forced(width: u8, value: u64) -> (u8, bool, u64) {
    (width, true, value)
}

// (S1) Two flat runs of two free 8-bit draws each: the root stays unsplit in a single chain
// that happens to have no branch (the two examples share no draws, so they live at different
// trail depths only once they diverge) and each recorded buffer rewrites to its own status;
// anything never recorded rewrites to unknown.
#[test]
fn two_recorded_runs_predict_and_leave_a_third_unknown() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(8, 0), free(8, 0)], Status::Valid, None).unwrap();
    record(
        &mut tree,
        &[free(8, 0), free(8, 1)],
        Status::Interesting,
        Some(Origin::new("boom")),
    )
    .unwrap();

    assert!(!tree.is_exhausted());
    assert_eq!(tree.rewrite(&[0, 0]).1, Some(Status::Valid));
    assert_eq!(tree.rewrite(&[0, 1]).1, Some(Status::Interesting));
    assert_eq!(tree.rewrite(&[0, 2]).1, None);
}

// (S2) A test that draws a single bit, recorded both ways, exhausts the tree.
#[test]
fn both_outcomes_of_a_single_bit_exhaust_the_tree() {
    let mut tree = Tree::new();
    assert!(!tree.is_exhausted());
    record(&mut tree, &[free(1, 0)], Status::Valid, None).unwrap();
    assert!(!tree.is_exhausted());
    record(&mut tree, &[free(1, 1)], Status::Valid, None).unwrap();
    assert!(tree.is_exhausted());
}

// (S3) A conditional second draw: `1,0`, `1,1`, and `0` together cover every path.
#[test]
fn conditional_branch_exhausts_once_every_path_concludes() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(1, 1), free(1, 0)], Status::Valid, None).unwrap();
    assert!(!tree.is_exhausted());
    record(&mut tree, &[free(1, 1), free(1, 1)], Status::Valid, None).unwrap();
    assert!(!tree.is_exhausted());
    record(&mut tree, &[free(1, 0)], Status::Valid, None).unwrap();
    assert!(tree.is_exhausted());
}

// (S4) Ten draws forced to 0 live inline in a single node — since every draw in the chain is
// forced, replaying with an empty buffer still reaches the recorded conclusion.
#[test]
fn an_all_forced_chain_replays_from_an_empty_buffer() {
    let mut tree = Tree::new();
    let draws: Vec<_> = (0..10).map(|_| forced(1, 0)).collect();
    record(&mut tree, &draws, Status::Interesting, Some(Origin::new("x"))).unwrap();

    let (_, status) = tree.rewrite(&[]);
    assert_eq!(status, Some(Status::Interesting));
}

// (S5) A shared prefix that diverges on its second draw splits into a branch; each resulting
// child independently continues recording its own tail.
#[test]
fn diverging_second_draw_splits_into_a_branch_with_independent_tails() {
    let mut tree = Tree::new();
    record(
        &mut tree,
        &[free(1, 0), free(1, 0), free(4, 2)],
        Status::Valid,
        None,
    )
    .unwrap();
    record(
        &mut tree,
        &[free(1, 0), free(1, 1), free(4, 3)],
        Status::Valid,
        None,
    )
    .unwrap();

    assert_eq!(tree.rewrite(&[0, 0, 2]).1, Some(Status::Valid));
    assert_eq!(tree.rewrite(&[0, 1, 3]).1, Some(Status::Valid));
    // Same shared prefix, but a tail value neither branch ever recorded.
    assert_eq!(tree.rewrite(&[0, 0, 9]).1, None);
    assert_eq!(tree.rewrite(&[0, 1, 9]).1, None);
}

// (S6) Splitting at a forced index must relabel the forced set correctly on both the relocated
// sibling and the newly recorded one — observable here as full exhaustion, since a relabeling
// bug would leave one side's chain permanently one draw short of its recorded conclusion.
#[test]
fn split_relocates_forced_indices_on_both_sides() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(1, 0), forced(1, 0)], Status::Valid, None).unwrap();
    record(&mut tree, &[free(1, 1), forced(1, 0)], Status::Valid, None).unwrap();
    assert!(tree.is_exhausted());
}

// (S7) A draw that was forced on the recorded run must be forced identically on replay; a
// live run that forces a different value at that position is flaky generation, not a new path.
#[test]
fn a_forced_draw_changing_value_on_replay_is_inconsistent_generation() {
    let mut tree = Tree::new();
    record(&mut tree, &[forced(1, 0)], Status::Valid, None).unwrap();

    let err = record(&mut tree, &[forced(1, 1)], Status::Valid, None).unwrap_err();
    assert!(matches!(err, TreeError::InconsistentGeneration { .. }));
}

#[test]
fn drawing_past_a_recorded_conclusion_is_inconsistent_generation() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(8, 0)], Status::Valid, None).unwrap();

    let err = record(
        &mut tree,
        &[free(8, 0), free(8, 1)],
        Status::Valid,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, TreeError::InconsistentGeneration { .. }));
}

// (S9) The two flaky-detection variants are distinguishable by matching, not string content.
#[test]
fn inconsistent_results_is_a_distinct_variant_from_inconsistent_generation() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(8, 0)], Status::Valid, None).unwrap();

    let err = record(&mut tree, &[free(8, 0)], Status::Invalid, None).unwrap_err();
    match err {
        TreeError::InconsistentResults { first, second } => {
            assert_eq!(first, Status::Valid);
            assert_eq!(second, Status::Invalid);
        }
        other => panic!("expected InconsistentResults, got {other:?}"),
    }
}

// (S8) A buffer too short for a recorded draw overruns; the tree itself is left untouched.
#[test]
fn a_short_buffer_overruns_without_mutating_the_tree() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(32, 0xabcd)], Status::Valid, None).unwrap();

    let (output, status) = tree.rewrite(&[0, 0]);
    assert_eq!(status, Some(Status::Overrun));
    assert!(output.is_empty());
    assert!(!tree.is_exhausted());
}

// Round-trip (quantified invariant 4): rewriting a recorded buffer returns the same bytes and
// the status it concluded with.
#[test]
fn rewrite_round_trips_every_recorded_buffer() {
    let mut tree = Tree::new();
    let recorded: [&[u8]; 3] = [&[1, 2], &[1, 3], &[9, 9]];
    for &buf in &recorded {
        let status = if buf == [9, 9] {
            Status::Interesting
        } else {
            Status::Valid
        };
        let mut observer = tree.new_observer();
        for &byte in buf {
            observer.draw_bits(8, false, byte as u64).unwrap();
        }
        observer.conclude_test(status, None).unwrap();
    }

    for &buf in &recorded {
        let (output, status) = tree.rewrite(buf);
        assert_eq!(output, buf);
        assert!(status.is_some());
    }
}

// Novelty (quantified invariant 5): a generated prefix must not already be predicted by the
// tree at the moment it was generated.
#[test]
fn generated_prefixes_are_unknown_to_the_tree_at_generation_time() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(1, 0)], Status::Valid, None).unwrap();

    let mut rng = StepRng::new(0x5a5a_5a5a_5a5a_5a5a, 0x1234_5678_9abc_def1);
    for _ in 0..16 {
        if tree.is_exhausted() {
            break;
        }
        let prefix = tree.generate_novel_prefix(&mut rng);
        assert_eq!(tree.rewrite(&prefix).1, None);
        // Recording the generated prefix must always be accepted: a generator that produced
        // something the tree itself cannot consistently record would be a contradiction.
        record(&mut tree, &[free(1, 1)], Status::Valid, None).ok();
    }
}

#[test]
#[should_panic(expected = "exhausted")]
fn generate_novel_prefix_panics_once_the_tree_is_exhausted() {
    let mut tree = Tree::new();
    record(&mut tree, &[free(1, 0)], Status::Valid, None).unwrap();
    record(&mut tree, &[free(1, 1)], Status::Valid, None).unwrap();
    assert!(tree.is_exhausted());

    let mut rng = StepRng::new(1, 1);
    tree.generate_novel_prefix(&mut rng);
}

// (S10) Config falls back to its default, and honors an explicit override. Exercised through
// `from_lookup` rather than `std::env::set_var`/`remove_var` so the test neither mutates
// process-wide state nor races other tests touching the same variable.
#[test]
fn config_from_env_falls_back_to_default_and_honors_override() {
    use drawtree::Config;

    let default_config = Config::from_lookup(|_| None);
    assert_eq!(default_config.novel_prefix_log_interval, 10_000);

    let overridden = Config::from_lookup(|key| {
        (key == "DRAWTREE_NOVEL_PREFIX_LOG_INTERVAL").then(|| "42".to_string())
    });
    assert_eq!(overridden.novel_prefix_log_interval, 42);
}
