//! Assembled / assembled-correctly calls for reference CDS and reference
//! sequences.
//!
//! Both calls compare a base count against a reference length and accept a
//! ratio in `[0.9, 1.1]`. For `assembled` the count is the merged union of all
//! hit spans. A reference sequence is `assembled_ok` only with exactly one hit,
//! judged on that hit's raw span, so extra hits inside already covered bases
//! change `assembled_ok` but not `assembled`.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::assembly::Assembly;
use crate::core::cds::CdsFeature;
use crate::core::hit::AlignmentHit;
use crate::core::interval::{Interval, IntervalSet};
use crate::core::reference::ReferenceLayout;
use crate::core::types::Strand;
use crate::qc::cds::CdsCatalog;
use crate::qc::hits::{CdsHits, ContigHits};
use crate::qc::orf::has_orf;
use crate::qc::QcError;

pub const MIN_ASSEMBLED_RATIO: f64 = 0.9;
pub const MAX_ASSEMBLED_RATIO: f64 = 1.1;

/// An ORF must span at least this fraction of its CDS
pub const MIN_ORF_FRACTION: f64 = 0.9;

#[must_use]
pub fn length_ratio_ok(bases: u64, length: u64) -> bool {
    if length == 0 {
        return false;
    }
    let ratio = bases as f64 / length as f64;
    (MIN_ASSEMBLED_RATIO..=MAX_ASSEMBLED_RATIO).contains(&ratio)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdsRecord {
    pub id: String,
    pub parent_sequence: String,
    pub ref_interval: Interval,
    pub strand: Strand,
    pub length_in_reference: u64,
    pub number_of_contig_hits: usize,
    pub bases_assembled: u64,
    pub assembled: bool,
    pub assembled_ok: bool,
}

/// Score one CDS from its hits against the assembly
///
/// # Errors
///
/// Returns `QcError::UnknownContig` if the single hit names a contig missing
/// from `assembly`, or `QcError::OutOfBounds` if it extends past the contig.
pub fn score_cds(
    cds: &CdsFeature,
    hits: &[AlignmentHit],
    assembly: &Assembly,
) -> Result<CdsRecord, QcError> {
    let length = cds.length_in_reference();
    let bases_assembled = hits
        .iter()
        .map(AlignmentHit::query_interval)
        .collect::<IntervalSet>()
        .total_length();

    let assembled_ok = match hits {
        [hit] => {
            let contig = assembly
                .get(&hit.ref_name)
                .ok_or_else(|| QcError::UnknownContig(hit.ref_name.clone()))?;
            let region = hit.ref_interval();
            let out_of_bounds = || QcError::OutOfBounds {
                sequence: contig.name.clone(),
                interval: region,
                length: contig.length(),
            };
            let start = usize::try_from(region.start).map_err(|_| out_of_bounds())?;
            let end = usize::try_from(region.end).map_err(|_| out_of_bounds())?;
            let seq = contig.sequence.get(start..=end).ok_or_else(out_of_bounds)?;
            has_orf(seq, MIN_ORF_FRACTION * length as f64)
        }
        _ => false,
    };

    Ok(CdsRecord {
        id: cds.id(),
        parent_sequence: cds.parent_sequence.clone(),
        ref_interval: cds.ref_interval,
        strand: cds.strand,
        length_in_reference: length,
        number_of_contig_hits: hits.len(),
        bases_assembled,
        assembled: length_ratio_ok(bases_assembled, length),
        assembled_ok,
    })
}

/// One record per reference CDS, in catalog order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CdsScores(Vec<CdsRecord>);

impl CdsScores {
    /// # Errors
    ///
    /// Returns `QcError` if a hit cannot be resolved against the assembly.
    pub fn compute(
        catalog: &CdsCatalog,
        hits: &CdsHits,
        assembly: &Assembly,
    ) -> Result<Self, QcError> {
        let records = catalog
            .iter()
            .map(|cds| score_cds(cds, hits.for_cds(&cds.id()), assembly))
            .collect::<Result<Vec<_>, _>>()?;

        let scores = Self(records);
        info!(
            "{} of {} CDS assembled, {} assembled correctly",
            scores.assembled_count(),
            scores.len(),
            scores.assembled_ok_count()
        );
        Ok(scores)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CdsRecord> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CdsRecord> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn assembled_count(&self) -> usize {
        self.0.iter().filter(|r| r.assembled).count()
    }

    #[must_use]
    pub fn assembled_ok_count(&self) -> usize {
        self.0.iter().filter(|r| r.assembled_ok).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefSeqAssemblyRecord {
    pub sequence: String,
    pub length: u64,
    pub hit_count: usize,
    pub bases_assembled: u64,
    pub assembled: bool,
    pub assembled_ok: bool,
}

/// Score one reference sequence from the contig hits that target it
#[must_use]
pub fn score_ref_sequence(sequence: &str, length: u64, hits: &[&AlignmentHit]) -> RefSeqAssemblyRecord {
    let bases_assembled = hits
        .iter()
        .map(|hit| hit.ref_interval())
        .collect::<IntervalSet>()
        .total_length();

    let assembled_ok = match hits {
        [hit] => length_ratio_ok(hit.ref_hit_length(), length),
        _ => false,
    };

    RefSeqAssemblyRecord {
        sequence: sequence.to_string(),
        length,
        hit_count: hits.len(),
        bases_assembled,
        assembled: length_ratio_ok(bases_assembled, length),
        assembled_ok,
    }
}

/// One record per reference sequence, in reference order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RefSeqScores(Vec<RefSeqAssemblyRecord>);

impl RefSeqScores {
    #[must_use]
    pub fn compute(layout: &ReferenceLayout, hits: &ContigHits) -> Self {
        let by_reference = hits.as_hits().by_reference();

        let records: Vec<RefSeqAssemblyRecord> = layout
            .iter()
            .map(|seq| {
                let seq_hits = by_reference
                    .get(seq.id.as_str())
                    .map_or(&[][..], Vec::as_slice);
                let record = score_ref_sequence(&seq.id, seq.length, seq_hits);
                debug!(
                    "{}: {} hits, {} bases assembled, assembled={}, assembled_ok={}",
                    record.sequence,
                    record.hit_count,
                    record.bases_assembled,
                    record.assembled,
                    record.assembled_ok
                );
                record
            })
            .collect();

        Self(records)
    }

    #[must_use]
    pub fn get(&self, sequence: &str) -> Option<&RefSeqAssemblyRecord> {
        self.0.iter().find(|r| r.sequence == sequence)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RefSeqAssemblyRecord> {
        self.0.iter()
    }

    #[must_use]
    pub fn assembled_count(&self) -> usize {
        self.0.iter().filter(|r| r.assembled).count()
    }

    #[must_use]
    pub fn assembled_ok_count(&self) -> usize {
        self.0.iter().filter(|r| r.assembled_ok).count()
    }
}
