//! Unique vs. repetitive hits of a single query.

use crate::core::hit::AlignmentHit;

/// A partition of one query's hits. Each list keeps input order.
#[derive(Debug, Default, PartialEq)]
pub struct ClassifiedHits<'a> {
    pub unique: Vec<&'a AlignmentHit>,
    pub repetitive: Vec<&'a AlignmentHit>,
}

/// Split the hits of one query by whether their query span overlaps the query
/// span of any other hit
#[must_use]
pub fn classify_hits(hits: &[AlignmentHit]) -> ClassifiedHits<'_> {
    let mut classified = ClassifiedHits::default();

    for (i, hit) in hits.iter().enumerate() {
        let overlapped = hits
            .iter()
            .enumerate()
            .any(|(j, other)| i != j && hit.query_overlaps(other));

        if overlapped {
            classified.repetitive.push(hit);
        } else {
            classified.unique.push(hit);
        }
    }

    classified
}
