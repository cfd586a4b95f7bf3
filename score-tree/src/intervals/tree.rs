//! Augmented interval index over rational offsets.

use fraction::Fraction;
use itertools::Itertools;

use super::interval::TimeInterval;
use super::rbtree::{NodeId, RedBlackTree};
use super::{IntervalError, IntervalResult};
use crate::primitives::{Duration, Offset};

/// A set of [`TimeInterval`]s indexed by start offset.
///
/// Intervals sharing a start share one tree node, so equal keys never
/// duplicate structure. Every node caches the earliest and latest stop
/// over its subtree; the query family uses those caches to skip whole
/// subtrees that can not contain a match. Structural transforms treat
/// the tree as a value and build new trees.
///
/// # Example
/// ```
/// use score_tree::intervals::{TimeInterval, TimeIntervalTree};
///
/// let tree = TimeIntervalTree::new([
///     TimeInterval::new(0, 10).unwrap(),
///     TimeInterval::new(1, 8).unwrap(),
///     TimeInterval::new(3, 13).unwrap(),
/// ]);
/// let hits = tree.find_intervals_intersecting_or_tangent_to_offset(9);
/// assert_eq!(hits.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimeIntervalTree {
    engine: RedBlackTree,
}

impl TimeIntervalTree {
    pub fn new(intervals: impl IntoIterator<Item = TimeInterval>) -> Self {
        let mut tree = Self::default();
        for interval in intervals {
            tree.engine.insert_interval(interval);
        }
        // one bottom-up pass after bulk insertion
        tree.engine.update_extrema();
        tree
    }

    /// Flatten other trees into one index.
    pub fn merged(trees: impl IntoIterator<Item = TimeIntervalTree>) -> Self {
        Self::new(trees.into_iter().flat_map(|tree| tree.intervals()))
    }

    pub fn insert(&mut self, interval: TimeInterval) {
        self.engine.insert_interval(interval);
    }

    /// Remove one occurrence of `interval`; false when absent.
    pub fn remove(&mut self, interval: &TimeInterval) -> bool {
        self.engine.remove_interval(interval)
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn contains(&self, interval: &TimeInterval) -> bool {
        self.engine
            .find_by_key(&interval.start())
            .map(|id| self.engine.node(id).intervals.contains(interval))
            .unwrap_or(false)
    }

    /// All intervals in key order; intervals sharing a start come out
    /// in (stop, payload) order.
    pub fn intervals(&self) -> Vec<TimeInterval> {
        let mut out = Vec::with_capacity(self.len());
        for id in self.engine.inorder() {
            let mut bucket = self.engine.node(id).intervals.clone();
            bucket.sort();
            out.extend(bucket);
        }
        out
    }

    pub fn earliest_start(&self) -> Option<Offset> {
        self.engine
            .root()
            .map(|root| self.engine.subtree_min_key(root))
    }

    pub fn latest_start(&self) -> Option<Offset> {
        self.engine
            .root()
            .map(|root| self.engine.subtree_max_key(root))
    }

    pub fn earliest_stop(&self) -> Option<Offset> {
        self.engine
            .root()
            .map(|root| self.engine.node(root).earliest_stop)
    }

    pub fn latest_stop(&self) -> Option<Offset> {
        self.engine
            .root()
            .map(|root| self.engine.node(root).latest_stop)
    }

    /// Span between the earliest start and the latest stop; zero on an
    /// empty tree.
    pub fn duration(&self) -> Duration {
        match (self.earliest_start(), self.latest_stop()) {
            (Some(start), Some(stop)) => start.distance_to(&stop),
            _ => Duration::zero(),
        }
    }

    pub fn find_intervals_intersecting_or_tangent_to_interval(
        &self,
        span: &TimeInterval,
    ) -> Self {
        let mut hits = Vec::new();
        collect_intersecting(
            &self.engine,
            self.engine.root(),
            span.start(),
            span.stop(),
            &mut hits,
        );
        Self::new(hits)
    }

    pub fn find_intervals_intersecting_or_tangent_to_offset(
        &self,
        offset: impl Into<Offset>,
    ) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_intersecting(&self.engine, self.engine.root(), offset, offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_starting_at_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let intervals = self
            .engine
            .find_by_key(&offset)
            .map(|id| self.engine.node(id).intervals.clone())
            .unwrap_or_default();
        Self::new(intervals)
    }

    pub fn find_intervals_stopping_at_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_stopping_at(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_starting_or_stopping_at_offset(
        &self,
        offset: impl Into<Offset>,
    ) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_starting_or_stopping_at(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_starting_before_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_starting_before(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_starting_after_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_starting_after(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_stopping_before_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_stopping_before(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_stopping_after_offset(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let mut hits = Vec::new();
        collect_stopping_after(&self.engine, self.engine.root(), offset, &mut hits);
        Self::new(hits)
    }

    pub fn find_intervals_starting_within_interval(&self, span: &TimeInterval) -> Self {
        let mut hits = Vec::new();
        collect_starting_within(
            &self.engine,
            self.engine.root(),
            span.start(),
            span.stop(),
            &mut hits,
        );
        Self::new(hits)
    }

    pub fn find_intervals_stopping_within_interval(&self, span: &TimeInterval) -> Self {
        let mut hits = Vec::new();
        collect_stopping_within(
            &self.engine,
            self.engine.root(),
            span.start(),
            span.stop(),
            &mut hits,
        );
        Self::new(hits)
    }

    pub fn find_intervals_starting_and_stopping_within_interval(
        &self,
        span: &TimeInterval,
    ) -> Self {
        let mut hits = Vec::new();
        collect_starting_and_stopping_within(
            &self.engine,
            self.engine.root(),
            span.start(),
            span.stop(),
            &mut hits,
        );
        Self::new(hits)
    }

    /// Translate every interval by `delta`.
    pub fn shift_by(&self, delta: Fraction) -> Self {
        Self::new(self.intervals().iter().map(|i| i.shift_by(delta)))
    }

    /// Translate so the aggregate starts at `offset`.
    pub fn shift_to(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        match self.earliest_start() {
            None => self.clone(),
            Some(start) => self.shift_by(offset.get() - start.get()),
        }
    }

    /// Scale the aggregate duration by `ratio`. Every interval keeps
    /// its position proportional to the tree's own start, not to zero.
    pub fn scale_by(&self, ratio: Fraction) -> IntervalResult<Self> {
        if ratio <= Fraction::from(0) {
            return Err(IntervalError::NonPositiveRatio(ratio));
        }
        let start = match self.earliest_start() {
            None => return Ok(self.clone()),
            Some(start) => start.get(),
        };
        Ok(Self::new(self.intervals().iter().map(|interval| {
            let new_start = Offset::from((interval.start().get() - start) * ratio + start);
            interval
                .shift_to(new_start)
                .scale_to(interval.duration() * ratio)
        })))
    }

    /// Scale the aggregate duration to `duration`.
    pub fn scale_to(&self, duration: Duration) -> IntervalResult<Self> {
        if duration.is_zero() {
            return Err(IntervalError::NonPositiveRatio(Fraction::from(0)));
        }
        if self.is_empty() {
            return Ok(self.clone());
        }
        if self.duration().is_zero() {
            return Err(IntervalError::ZeroDuration);
        }
        self.scale_by(duration / self.duration())
    }

    /// Round every bound to the nearest multiple of `quantum`; an
    /// interval that would collapse keeps one quantum of length.
    pub fn quantize_to(&self, quantum: Fraction) -> IntervalResult<Self> {
        if quantum <= Fraction::from(0) {
            return Err(IntervalError::NonPositiveQuantum(quantum));
        }
        Ok(Self::new(self.intervals().iter().map(|interval| {
            let start = interval.start().round_to_multiple(quantum);
            let mut stop = interval.stop().round_to_multiple(quantum);
            if start == stop {
                stop = start + quantum;
            }
            interval.shift_to(start).scale_to(
                Duration::from_fraction(stop.get() - start.get())
                    .expect("quantized stop never precedes start"),
            )
        })))
    }

    /// Partition at every offset strictly inside the aggregate span.
    /// Straddling intervals split, one half donated to each side.
    pub fn split_at(&self, offsets: &[Offset]) -> Vec<Self> {
        let (start, stop) = match (self.earliest_start(), self.latest_stop()) {
            (Some(start), Some(stop)) => (start, stop),
            _ => return vec![self.clone()],
        };
        let points: Vec<Offset> = offsets
            .iter()
            .copied()
            .sorted()
            .dedup()
            .filter(|point| start < *point && *point < stop)
            .collect();
        if points.is_empty() {
            return vec![self.clone()];
        }

        let mut trees = Vec::new();
        let mut intervals = self.intervals();
        for point in points {
            let mut before = Vec::new();
            let mut after = Vec::new();
            for interval in intervals {
                let mut splits = interval.split_at(point).into_iter();
                let head = splits.next().expect("split yields at least one interval");
                match splits.next() {
                    Some(tail) => {
                        before.push(head);
                        after.push(tail);
                    }
                    None => {
                        if head.stop() <= point {
                            before.push(head);
                        } else {
                            after.push(head);
                        }
                    }
                }
            }
            if !before.is_empty() {
                trees.push(Self::new(before));
            }
            intervals = after;
        }
        if !intervals.is_empty() {
            trees.push(Self::new(intervals));
        }
        trees
    }
}

impl PartialEq for TimeIntervalTree {
    fn eq(&self, other: &Self) -> bool {
        self.intervals() == other.intervals()
    }
}

impl FromIterator<TimeInterval> for TimeIntervalTree {
    fn from_iter<T: IntoIterator<Item = TimeInterval>>(iter: T) -> Self {
        Self::new(iter)
    }
}

// Traversals recurse node by node with explicit bounds, stepping into a
// child only when its cached extrema allow a match there.

fn collect_intersecting(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    start: Offset,
    stop: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if node.key <= stop && start <= node.latest_stop {
        for interval in &node.intervals {
            if interval.start() <= stop && start <= interval.stop() {
                out.push(interval.clone());
            }
        }
    }
    if let Some(left) = node.left {
        if engine.subtree_min_key(left) <= stop && start <= engine.node(left).latest_stop {
            collect_intersecting(engine, Some(left), start, stop, out);
        }
    }
    if let Some(right) = node.right {
        if engine.subtree_min_key(right) <= stop && start <= engine.node(right).latest_stop {
            collect_intersecting(engine, Some(right), start, stop, out);
        }
    }
}

fn collect_starting_before(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if node.key < offset {
        out.extend(node.intervals.iter().cloned());
    }
    if node.left.is_some() {
        collect_starting_before(engine, node.left, offset, out);
    }
    if let Some(right) = node.right {
        if engine.subtree_min_key(right) < offset {
            collect_starting_before(engine, Some(right), offset, out);
        }
    }
}

fn collect_starting_after(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if offset < node.key {
        out.extend(node.intervals.iter().cloned());
    }
    if let Some(left) = node.left {
        if offset < engine.subtree_max_key(left) {
            collect_starting_after(engine, Some(left), offset, out);
        }
    }
    if node.right.is_some() {
        collect_starting_after(engine, node.right, offset, out);
    }
}

fn collect_stopping_at(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if node.earliest_stop <= offset && offset <= node.latest_stop {
        for interval in &node.intervals {
            if interval.stop() == offset {
                out.push(interval.clone());
            }
        }
    }
    if let Some(left) = node.left {
        if offset <= engine.node(left).latest_stop {
            collect_stopping_at(engine, Some(left), offset, out);
        }
    }
    if let Some(right) = node.right {
        if engine.node(right).earliest_stop <= offset {
            collect_stopping_at(engine, Some(right), offset, out);
        }
    }
}

fn collect_starting_or_stopping_at(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if node.key <= offset && offset <= node.latest_stop {
        for interval in &node.intervals {
            if interval.start() == offset || interval.stop() == offset {
                out.push(interval.clone());
            }
        }
    }
    if let Some(left) = node.left {
        if offset <= engine.node(left).latest_stop {
            collect_starting_or_stopping_at(engine, Some(left), offset, out);
        }
    }
    if let Some(right) = node.right {
        if engine.subtree_min_key(right) <= offset && offset <= engine.node(right).latest_stop
        {
            collect_starting_or_stopping_at(engine, Some(right), offset, out);
        }
    }
}

fn collect_stopping_before(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if node.key <= offset && node.earliest_stop < offset {
        for interval in &node.intervals {
            if interval.stop() < offset {
                out.push(interval.clone());
            }
        }
    }
    if let Some(left) = node.left {
        if engine.node(left).earliest_stop < offset {
            collect_stopping_before(engine, Some(left), offset, out);
        }
    }
    if let Some(right) = node.right {
        if engine.node(right).earliest_stop < offset {
            collect_stopping_before(engine, Some(right), offset, out);
        }
    }
}

fn collect_stopping_after(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    offset: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if offset < node.latest_stop {
        for interval in &node.intervals {
            if offset < interval.stop() {
                out.push(interval.clone());
            }
        }
    }
    if let Some(left) = node.left {
        if offset < engine.node(left).latest_stop {
            collect_stopping_after(engine, Some(left), offset, out);
        }
    }
    if let Some(right) = node.right {
        if offset < engine.node(right).latest_stop {
            collect_stopping_after(engine, Some(right), offset, out);
        }
    }
}

fn collect_starting_within(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    start: Offset,
    stop: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if start <= node.key && node.key <= stop {
        out.extend(node.intervals.iter().cloned());
    }
    if let Some(left) = node.left {
        if start <= engine.subtree_max_key(left) && engine.subtree_min_key(left) <= stop {
            collect_starting_within(engine, Some(left), start, stop, out);
        }
    }
    if let Some(right) = node.right {
        if start <= engine.subtree_max_key(right) && engine.subtree_min_key(right) <= stop {
            collect_starting_within(engine, Some(right), start, stop, out);
        }
    }
}

fn collect_stopping_within(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    start: Offset,
    stop: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if start <= node.latest_stop && node.earliest_stop <= stop {
        for interval in &node.intervals {
            if start <= interval.stop() && interval.stop() <= stop {
                out.push(interval.clone());
            }
        }
    }
    for child in [node.left, node.right].into_iter().flatten() {
        let child_node = engine.node(child);
        if start <= child_node.latest_stop && child_node.earliest_stop <= stop {
            collect_stopping_within(engine, Some(child), start, stop, out);
        }
    }
}

fn collect_starting_and_stopping_within(
    engine: &RedBlackTree,
    id: Option<NodeId>,
    start: Offset,
    stop: Offset,
    out: &mut Vec<TimeInterval>,
) {
    let id = match id {
        Some(id) => id,
        None => return,
    };
    let node = engine.node(id);
    if start <= node.key && node.earliest_stop <= stop {
        for interval in &node.intervals {
            if start <= interval.start() && interval.stop() <= stop {
                out.push(interval.clone());
            }
        }
    }
    for child in [node.left, node.right].into_iter().flatten() {
        if start <= engine.subtree_max_key(child) && engine.node(child).earliest_stop <= stop {
            collect_starting_and_stopping_within(engine, Some(child), start, stop, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use super::TimeIntervalTree;
    use crate::intervals::TimeInterval;
    use crate::primitives::{Duration, Offset};

    fn interval(start: i64, stop: i64) -> TimeInterval {
        TimeInterval::new(start, stop).unwrap()
    }

    fn sample() -> TimeIntervalTree {
        TimeIntervalTree::new([interval(0, 10), interval(1, 8), interval(3, 13)])
    }

    #[test]
    fn aggregates() {
        let tree = sample();
        assert_eq!(tree.earliest_start(), Some(Offset::from(0)));
        assert_eq!(tree.latest_start(), Some(Offset::from(3)));
        assert_eq!(tree.earliest_stop(), Some(Offset::from(8)));
        assert_eq!(tree.latest_stop(), Some(Offset::from(13)));
        assert_eq!(tree.duration(), Duration::new(13, 1));
    }

    #[test]
    fn empty_tree() {
        let tree = TimeIntervalTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.duration(), Duration::zero());
        assert_eq!(tree.earliest_start(), None);
        assert_eq!(tree.latest_stop(), None);
        assert!(tree.find_intervals_intersecting_or_tangent_to_offset(0).is_empty());
        assert!(tree.find_intervals_starting_at_offset(0).is_empty());
        assert_eq!(tree.split_at(&[Offset::from(1)]), vec![tree.clone()]);
    }

    #[test]
    fn intersecting_offset() {
        let hits = sample().find_intervals_intersecting_or_tangent_to_offset(9);
        assert_eq!(hits.intervals(), vec![interval(0, 10), interval(3, 13)]);
    }

    #[test]
    fn intersecting_interval_is_tangent_inclusive() {
        let tree = sample();
        let hits =
            tree.find_intervals_intersecting_or_tangent_to_interval(&interval(13, 20));
        assert_eq!(hits.intervals(), vec![interval(3, 13)]);
        let hits = tree.find_intervals_intersecting_or_tangent_to_interval(&interval(14, 20));
        assert!(hits.is_empty());
    }

    #[test]
    fn start_and_stop_queries() {
        let tree = sample();
        assert!(tree
            .find_intervals_starting_at_offset(1)
            .contains(&interval(1, 8)));
        assert_eq!(
            tree.find_intervals_starting_before_offset(1).intervals(),
            vec![interval(0, 10)]
        );
        assert_eq!(
            tree.find_intervals_starting_after_offset(1).intervals(),
            vec![interval(3, 13)]
        );
        assert_eq!(
            tree.find_intervals_stopping_before_offset(10).intervals(),
            vec![interval(1, 8)]
        );
        assert_eq!(
            tree.find_intervals_stopping_after_offset(10).intervals(),
            vec![interval(3, 13)]
        );
        assert_eq!(
            tree.find_intervals_stopping_at_offset(8).intervals(),
            vec![interval(1, 8)]
        );
        assert_eq!(
            tree.find_intervals_starting_or_stopping_at_offset(8).intervals(),
            vec![interval(1, 8)]
        );
    }

    #[test]
    fn within_queries() {
        let tree = sample();
        assert_eq!(
            tree.find_intervals_starting_within_interval(&interval(1, 3)).intervals(),
            vec![interval(1, 8), interval(3, 13)]
        );
        assert_eq!(
            tree.find_intervals_stopping_within_interval(&interval(8, 10)).intervals(),
            vec![interval(0, 10), interval(1, 8)]
        );
        assert_eq!(
            tree.find_intervals_starting_and_stopping_within_interval(&interval(0, 10))
                .intervals(),
            vec![interval(0, 10), interval(1, 8)]
        );
    }

    #[test]
    fn multiset_starts() {
        let tree = TimeIntervalTree::new([
            interval(0, 4),
            interval(0, 4),
            interval(0, 2),
        ]);
        assert_eq!(tree.len(), 3);
        let hits = tree.find_intervals_starting_at_offset(0);
        assert_eq!(hits.len(), 3);
        assert_eq!(
            hits.intervals(),
            vec![interval(0, 2), interval(0, 4), interval(0, 4)]
        );
    }

    #[test]
    fn shift_is_persistent() {
        let tree = sample();
        let shifted = tree.shift_by(-Fraction::from(3));
        assert_eq!(shifted.earliest_start(), Some(Offset::from(-3)));
        assert_eq!(tree.earliest_start(), Some(Offset::from(0)));
        let back = shifted.shift_to(0);
        assert_eq!(back, tree);
        // already-there shift is identity
        assert_eq!(tree.shift_to(0), tree);
    }

    #[test]
    fn scale_by_is_proportional_to_tree_start() {
        let tree = TimeIntervalTree::new([
            interval(0, 1),
            TimeInterval::new((1i64, 2u64), (5i64, 2u64)).unwrap(),
            interval(2, 4),
        ]);
        let scaled = tree.scale_by(Fraction::new(2u64, 3u64)).unwrap();
        assert_eq!(
            scaled.intervals(),
            vec![
                TimeInterval::new(0, (2i64, 3u64)).unwrap(),
                TimeInterval::new((1i64, 3u64), (5i64, 3u64)).unwrap(),
                TimeInterval::new((4i64, 3u64), (8i64, 3u64)).unwrap(),
            ]
        );
        assert!(tree.scale_by(-Fraction::from(1)).is_err());
    }

    #[test]
    fn scale_to_duration() {
        let tree = sample();
        let scaled = tree.scale_to(Duration::new(26, 1)).unwrap();
        assert_eq!(scaled.duration(), Duration::new(26, 1));
        assert_eq!(scaled.earliest_start(), tree.earliest_start());
        assert!(tree.scale_to(Duration::zero()).is_err());
    }

    #[test]
    fn quantize_is_idempotent() {
        let tree = TimeIntervalTree::new([
            TimeInterval::new((1i64, 16u64), (5i64, 16u64)).unwrap(),
            TimeInterval::new((3i64, 8u64), (7i64, 16u64)).unwrap(),
        ]);
        let quantum = Fraction::new(1u64, 4u64);
        let once = tree.quantize_to(quantum).unwrap();
        let twice = once.quantize_to(quantum).unwrap();
        assert_eq!(once, twice);
        // collapsed interval keeps one quantum
        assert!(once
            .intervals()
            .iter()
            .all(|i| i.duration() >= Duration::new(1, 4)));
        assert!(tree.quantize_to(Fraction::from(0)).is_err());
    }

    #[test]
    fn split_donates_halves() {
        let tree = TimeIntervalTree::new([
            interval(0, 1).with_entry("name", "one"),
            TimeInterval::new((1i64, 2u64), (5i64, 2u64))
                .unwrap()
                .with_entry("name", "two"),
            interval(2, 4).with_entry("name", "three"),
        ]);
        let parts = tree.split_at(&[Offset::from(1), Offset::from(2), Offset::from(3)]);
        assert_eq!(parts.len(), 4);
        assert_eq!(
            parts[0].intervals(),
            vec![
                interval(0, 1).with_entry("name", "one"),
                TimeInterval::new((1i64, 2u64), 1).unwrap().with_entry("name", "two"),
            ]
        );
        assert_eq!(
            parts[1].intervals(),
            vec![interval(1, 2).with_entry("name", "two")]
        );
        assert_eq!(
            parts[2].intervals(),
            vec![
                TimeInterval::new(2, (5i64, 2u64)).unwrap().with_entry("name", "two"),
                interval(2, 3).with_entry("name", "three"),
            ]
        );
        assert_eq!(
            parts[3].intervals(),
            vec![interval(3, 4).with_entry("name", "three")]
        );
        // outside points are ignored
        assert_eq!(tree.split_at(&[Offset::from(-5)]), vec![tree.clone()]);
    }

    #[test]
    fn starting_at_contains_every_inserted_start() {
        let spans = [
            interval(0, 10),
            interval(1, 8),
            interval(3, 13),
            interval(3, 5),
            interval(-2, 0),
        ];
        let tree = TimeIntervalTree::new(spans.clone());
        for span in &spans {
            assert!(tree
                .find_intervals_starting_at_offset(span.start())
                .contains(span));
        }
    }
}
