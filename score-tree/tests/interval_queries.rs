use once_cell::sync::Lazy;

use score_tree::intervals::{TimeInterval, TimeIntervalTree};
use score_tree::primitives::{Duration, Offset};

static TREE: Lazy<TimeIntervalTree> = Lazy::new(|| {
    TimeIntervalTree::new([
        TimeInterval::new(0, 10).unwrap(),
        TimeInterval::new(1, 8).unwrap(),
        TimeInterval::new(3, 13).unwrap(),
    ])
});

#[test]
fn tangency_at_an_offset() {
    env_logger::builder().is_test(true).try_init().ok();
    let hits = TREE.find_intervals_intersecting_or_tangent_to_offset(9);
    assert_eq!(
        hits.intervals(),
        vec![
            TimeInterval::new(0, 10).unwrap(),
            TimeInterval::new(3, 13).unwrap(),
        ]
    );
}

#[test]
fn every_inserted_interval_is_found_at_its_start() {
    for interval in TREE.intervals() {
        let found = TREE.find_intervals_starting_at_offset(interval.start());
        assert!(found.contains(&interval));
    }
}

#[test]
fn aggregate_duration_matches_extrema() {
    assert_eq!(TREE.earliest_start(), Some(Offset::from(0)));
    assert_eq!(TREE.latest_stop(), Some(Offset::from(13)));
    assert_eq!(
        TREE.duration(),
        TREE.earliest_start()
            .unwrap()
            .distance_to(&TREE.latest_stop().unwrap())
    );
}

#[test]
fn queries_return_new_trees() {
    let before = TREE.intervals();
    let _ = TREE.find_intervals_stopping_before_offset(100);
    let _ = TREE.find_intervals_starting_after_offset(-100);
    assert_eq!(TREE.intervals(), before);
}

#[test]
fn query_results_nest_into_new_trees() {
    let stopping_early = TREE.find_intervals_stopping_before_offset(11);
    let merged = TimeIntervalTree::merged([
        stopping_early.clone(),
        TREE.find_intervals_starting_after_offset(1),
    ]);
    // (0,10) and (1,8) stop before 11; (3,13) starts after 1
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.duration(), Duration::new(13, 1));
}

#[test]
fn empty_tree_queries_are_empty_not_errors() {
    let empty = TimeIntervalTree::default();
    assert_eq!(empty.duration(), Duration::zero());
    assert_eq!(empty.earliest_start(), None);
    assert_eq!(empty.earliest_stop(), None);
    assert_eq!(empty.latest_start(), None);
    assert_eq!(empty.latest_stop(), None);
    assert!(empty.find_intervals_intersecting_or_tangent_to_offset(5).is_empty());
    assert!(empty
        .find_intervals_starting_or_stopping_at_offset(0)
        .is_empty());
    assert!(empty.find_intervals_stopping_after_offset(-3).is_empty());
}
