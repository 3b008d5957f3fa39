use serde::{Deserialize, Serialize};

use crate::core::interval::Interval;

/// One pairwise alignment between a query sequence and a reference sequence.
///
/// Coordinates are 0-based and kept in the order the aligner reported them, so
/// `query_start > query_end` (or `ref_start > ref_end`) marks the reverse
/// strand on that side. Use [`AlignmentHit::query_interval`] and
/// [`AlignmentHit::ref_interval`] for ordered ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    pub query_name: String,
    pub query_start: u64,
    pub query_end: u64,
    pub ref_name: String,
    pub ref_start: u64,
    pub ref_end: u64,

    /// Percent identity of the alignment (0-100)
    pub percent_identity: f64,

    /// Total length of the query sequence, when the aligner reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_length: Option<u64>,

    /// Total length of the reference sequence, when the aligner reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_length: Option<u64>,
}

impl AlignmentHit {
    pub fn new(
        query_name: impl Into<String>,
        query_coords: (u64, u64),
        ref_name: impl Into<String>,
        ref_coords: (u64, u64),
    ) -> Self {
        Self {
            query_name: query_name.into(),
            query_start: query_coords.0,
            query_end: query_coords.1,
            ref_name: ref_name.into(),
            ref_start: ref_coords.0,
            ref_end: ref_coords.1,
            percent_identity: 100.0,
            query_length: None,
            ref_length: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, percent_identity: f64) -> Self {
        self.percent_identity = percent_identity;
        self
    }

    /// Query-side span with `start <= end`
    #[must_use]
    pub fn query_interval(&self) -> Interval {
        Interval::from_unordered(self.query_start, self.query_end)
    }

    /// Reference-side span with `start <= end`
    #[must_use]
    pub fn ref_interval(&self) -> Interval {
        Interval::from_unordered(self.ref_start, self.ref_end)
    }

    /// Raw length of the alignment on the reference
    #[must_use]
    pub fn ref_hit_length(&self) -> u64 {
        self.ref_interval().len()
    }

    /// Raw length of the alignment on the query
    #[must_use]
    pub fn query_hit_length(&self) -> u64 {
        self.query_interval().len()
    }

    /// True if query and reference coordinates run in the same direction
    #[must_use]
    pub fn same_strand(&self) -> bool {
        (self.query_start <= self.query_end) == (self.ref_start <= self.ref_end)
    }

    /// True if the query-side spans of the two hits share a position
    #[must_use]
    pub fn query_overlaps(&self, other: &Self) -> bool {
        self.query_interval().intersects(&other.query_interval())
    }
}
