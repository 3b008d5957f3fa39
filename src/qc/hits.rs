//! Alignment hit sets checked against the sequences they refer to.
//!
//! Holding a [`ContigHits`] or [`CdsHits`] means every hit names a known
//! sequence and lies inside it, so later stages can index without checks.

use tracing::debug;

use crate::core::assembly::Assembly;
use crate::core::hit::AlignmentHit;
use crate::core::interval::Interval;
use crate::core::reference::ReferenceLayout;
use crate::parsing::coords::HitsByQuery;
use crate::qc::cds::CdsCatalog;
use crate::qc::QcError;

/// Hits of assembly contigs (query) against the reference
#[derive(Debug, Clone, Default)]
pub struct ContigHits(HitsByQuery);

impl ContigHits {
    /// The hit set of an empty assembly
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Check contig-vs-reference hits against the assembly and the reference
    /// layout
    ///
    /// # Errors
    ///
    /// Returns `QcError::UnknownContig` if a hit comes from a contig missing
    /// from the assembly, `QcError::UnknownReference` if it targets a sequence
    /// missing from the layout, or `QcError::OutOfBounds` if either side
    /// extends past the end of its sequence.
    pub fn validate(
        hits: HitsByQuery,
        assembly: &Assembly,
        layout: &ReferenceLayout,
    ) -> Result<Self, QcError> {
        for (contig_name, contig_hits) in hits.iter() {
            let contig = assembly
                .get(contig_name)
                .ok_or_else(|| QcError::UnknownContig(contig_name.to_string()))?;
            for hit in contig_hits {
                check_bounds(contig_name, hit.query_interval(), contig.length())?;
                let length = layout
                    .length_of(&hit.ref_name)
                    .ok_or_else(|| QcError::UnknownReference(hit.ref_name.clone()))?;
                check_bounds(&hit.ref_name, hit.ref_interval(), length)?;
            }
        }

        debug!(
            "{} contigs have {} hits to the reference",
            hits.len(),
            hits.hit_count()
        );
        Ok(Self(hits))
    }

    #[must_use]
    pub fn as_hits(&self) -> &HitsByQuery {
        &self.0
    }

    /// `(contig, hits)` pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AlignmentHit])> {
        self.0.iter()
    }

    /// Number of contigs with at least one hit
    #[must_use]
    pub fn contig_count(&self) -> usize {
        self.0.len()
    }
}

/// Hits of reference CDS sequences (query) against the assembly
#[derive(Debug, Clone, Default)]
pub struct CdsHits(HitsByQuery);

impl CdsHits {
    /// The hit set of an empty assembly
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Check CDS-vs-assembly hits against the annotation and the assembly
    ///
    /// # Errors
    ///
    /// Returns `QcError::UnknownCds` or `QcError::UnknownContig` if a hit names
    /// a sequence that does not exist, or `QcError::OutOfBounds` if a hit
    /// extends past the end of its contig.
    pub fn validate(
        hits: HitsByQuery,
        catalog: &CdsCatalog,
        assembly: &Assembly,
    ) -> Result<Self, QcError> {
        for (cds_id, cds_hits) in hits.iter() {
            if !catalog.contains(cds_id) {
                return Err(QcError::UnknownCds(cds_id.to_string()));
            }
            for hit in cds_hits {
                let contig = assembly
                    .get(&hit.ref_name)
                    .ok_or_else(|| QcError::UnknownContig(hit.ref_name.clone()))?;
                check_bounds(&hit.ref_name, hit.ref_interval(), contig.length())?;
            }
        }

        debug!(
            "{} CDS have {} hits to the assembly",
            hits.len(),
            hits.hit_count()
        );
        Ok(Self(hits))
    }

    /// Hits of one CDS, empty if it has none
    #[must_use]
    pub fn for_cds(&self, cds_id: &str) -> &[AlignmentHit] {
        self.0.get(cds_id).unwrap_or(&[])
    }
}

/// Check that one side of a hit lies inside a sequence of `length`
fn check_bounds(sequence: &str, interval: Interval, length: u64) -> Result<(), QcError> {
    if interval.end >= length {
        return Err(QcError::OutOfBounds {
            sequence: sequence.to_string(),
            interval,
            length,
        });
    }
    Ok(())
}
