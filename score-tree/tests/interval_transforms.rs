use fraction::Fraction;

use score_tree::intervals::{TimeInterval, TimeIntervalTree};
use score_tree::primitives::{Duration, Offset};

fn named(start: (i64, u64), stop: (i64, u64), name: &str) -> TimeInterval {
    TimeInterval::new(start, stop).unwrap().with_entry("name", name)
}

#[test]
fn scale_by_keeps_positions_proportional_to_tree_start() {
    let tree = TimeIntervalTree::new([
        named((0, 1), (1, 1), "one"),
        named((1, 2), (5, 2), "two"),
        named((2, 1), (4, 1), "three"),
    ]);
    let scaled = tree.scale_by(Fraction::new(2u64, 3u64)).unwrap();
    assert_eq!(
        scaled.intervals(),
        vec![
            named((0, 1), (2, 3), "one"),
            named((1, 3), (5, 3), "two"),
            named((4, 3), (8, 3), "three"),
        ]
    );
    // the original is a value, untouched
    assert_eq!(tree.duration(), Duration::new(4, 1));
}

#[test]
fn scaling_a_negative_start_tree_anchors_at_its_own_start() {
    let tree = TimeIntervalTree::new([
        named((-4, 1), (0, 1), "zero"),
        named((0, 1), (1, 1), "one"),
    ]);
    let scaled = tree.scale_by(Fraction::from(2)).unwrap();
    assert_eq!(scaled.earliest_start(), Some(Offset::from(-4)));
    assert_eq!(
        scaled.intervals(),
        vec![
            named((-4, 1), (4, 1), "zero"),
            named((4, 1), (6, 1), "one"),
        ]
    );
}

#[test]
fn shift_to_own_start_is_identity() {
    let tree = TimeIntervalTree::new([
        named((1, 2), (3, 2), "a"),
        named((2, 1), (3, 1), "b"),
    ]);
    let start = tree.earliest_start().unwrap();
    assert_eq!(tree.shift_to(start), tree);
}

#[test]
fn quantize_twice_equals_once() {
    let tree = TimeIntervalTree::new([
        TimeInterval::new((1, 16), (5, 16)).unwrap(),
        TimeInterval::new((3, 8), (7, 16)).unwrap(),
        TimeInterval::new((9, 8), (9, 8)).unwrap(),
    ]);
    let quantum = Fraction::new(1u64, 4u64);
    let once = tree.quantize_to(quantum).unwrap();
    assert_eq!(once.quantize_to(quantum).unwrap(), once);
    // no interval ever collapses to nothing
    assert!(once.intervals().iter().all(|i| !i.duration().is_zero()));
}

#[test]
fn split_partitions_and_respects_bounds() {
    let tree = TimeIntervalTree::new([
        named((0, 1), (1, 1), "one"),
        named((1, 2), (5, 2), "two"),
        named((2, 1), (4, 1), "three"),
    ]);
    let parts = tree.split_at(&[Offset::from(1), Offset::from(3)]);
    assert_eq!(parts.len(), 3);
    // every part stays within its slice and the total content survives
    let total: usize = parts.iter().map(TimeIntervalTree::len).sum();
    assert_eq!(total, 5);
    assert!(parts[0].latest_stop().unwrap() <= Offset::from(1));
    assert!(parts[1].earliest_start().unwrap() >= Offset::from(1));
    assert!(parts[1].latest_stop().unwrap() <= Offset::from(3));
    assert!(parts[2].earliest_start().unwrap() >= Offset::from(3));
}

#[test]
fn duration_is_never_negative() {
    let trees = [
        TimeIntervalTree::default(),
        TimeIntervalTree::new([TimeInterval::new(-7, -2).unwrap()]),
        TimeIntervalTree::new([TimeInterval::new(4, 4).unwrap()]),
    ];
    for tree in &trees {
        assert!(tree.duration() >= Duration::zero());
        if !tree.is_empty() {
            assert_eq!(
                tree.duration(),
                tree.earliest_start()
                    .unwrap()
                    .distance_to(&tree.latest_stop().unwrap())
            );
        }
    }
}
