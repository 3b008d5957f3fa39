//! Closed integer intervals and normalized interval sets.
//!
//! All coordinates are 0-based and inclusive on both ends, so `(0, 9)` spans
//! ten positions. Operations that care about adjacency (`merge_overlapping`)
//! treat `(0, 4)` and `(5, 9)` as one contiguous span.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` range on one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create an interval.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Callers that cannot guarantee the order
    /// should use [`Interval::from_unordered`].
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        assert!(start <= end, "interval start {start} is after end {end}");
        Self { start, end }
    }

    /// Create an interval from two endpoints given in either order
    #[must_use]
    pub fn from_unordered(a: u64, b: u64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of positions covered
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false: an interval covers at least one position
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the two intervals share at least one position
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True if the intervals intersect or `self` ends right before `other` starts
    /// (or vice versa)
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.intersects(other)
            || self.end.checked_add(1) == Some(other.start)
            || other.end.checked_add(1) == Some(self.start)
    }

    /// Shared positions of two intervals, if any
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if self.intersects(other) {
            Some(Self::new(self.start.max(other.start), self.end.min(other.end)))
        } else {
            None
        }
    }

    /// Shift both ends by `offset`
    #[must_use]
    pub fn offset_by(&self, offset: u64) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Sort intervals by start and fold overlapping or touching ones into single spans
#[must_use]
pub fn merge_overlapping(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.touches(&interval) => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// Sum of interval lengths. Overcounts unless the list is already merged.
#[must_use]
pub fn total_length(intervals: &[Interval]) -> u64 {
    intervals.iter().map(Interval::len).sum()
}

/// Gaps between sorted, non-overlapping intervals over `[0, sequence_length - 1]`
///
/// An empty input yields one interval covering the whole sequence; a fully
/// covered (or zero-length) sequence yields nothing.
#[must_use]
pub fn invert(intervals: &[Interval], sequence_length: u64) -> Vec<Interval> {
    if sequence_length == 0 {
        return Vec::new();
    }
    let last_position = sequence_length - 1;

    let mut gaps = Vec::new();
    let mut next_uncovered = 0u64;
    for interval in intervals {
        if interval.start > last_position {
            break;
        }
        if interval.start > next_uncovered {
            gaps.push(Interval::new(next_uncovered, interval.start - 1));
        }
        next_uncovered = next_uncovered.max(interval.end.saturating_add(1));
        if next_uncovered > last_position {
            return gaps;
        }
    }

    gaps.push(Interval::new(next_uncovered, last_position));
    gaps
}

/// Positions present in both sorted, non-overlapping lists
#[must_use]
pub fn intersect(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if let Some(shared) = a[i].intersection(&b[j]) {
            out.push(shared);
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

/// A sorted list of non-overlapping, non-touching intervals
///
/// Every constructor normalizes its input, so lengths and complements computed
/// from a set never double count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary intervals, merging as needed
    #[must_use]
    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self {
            intervals: merge_overlapping(intervals),
        }
    }

    /// A set holding one interval spanning the whole sequence
    #[must_use]
    pub fn full(sequence_length: u64) -> Self {
        Self::new().complement(sequence_length)
    }

    /// Total number of positions in the set
    #[must_use]
    pub fn total_length(&self) -> u64 {
        total_length(&self.intervals)
    }

    /// Positions of `[0, sequence_length - 1]` not in the set
    #[must_use]
    pub fn complement(&self, sequence_length: u64) -> Self {
        Self {
            intervals: invert(&self.intervals, sequence_length),
        }
    }

    /// Positions present in both sets
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            intervals: intersect(&self.intervals, &other.intervals),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self::from_intervals(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
