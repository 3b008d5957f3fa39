//! Read coverage of the reference, per strand.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::interval::{Interval, IntervalSet};
use crate::core::reference::ReferenceLayout;
use crate::core::types::{Strand, Stranded};
use crate::parsing::bam::StrandDepths;
use crate::qc::QcError;

/// Runs of positions whose depth is below `min_cov`
#[must_use]
pub fn low_coverage_intervals(depths: &[u32], min_cov: u32) -> IntervalSet {
    let mut intervals = Vec::new();
    let mut run_start: Option<usize> = None;

    for (pos, &depth) in depths.iter().enumerate() {
        match (depth < min_cov, run_start) {
            (true, None) => run_start = Some(pos),
            (false, Some(start)) => {
                intervals.push(Interval::new(start as u64, pos as u64 - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        intervals.push(Interval::new(start as u64, depths.len() as u64 - 1));
    }

    IntervalSet::from_intervals(intervals)
}

/// Coverage classification of one reference sequence
#[derive(Debug, Clone, Serialize)]
pub struct SequenceCoverage {
    pub sequence: String,
    pub low_forward: IntervalSet,
    pub low_reverse: IntervalSet,

    /// Low on both strands at once
    pub low_both: IntervalSet,

    /// Adequately covered on both strands
    pub ok: IntervalSet,
}

impl SequenceCoverage {
    fn from_low(sequence: &str, length: u64, low: Stranded<IntervalSet>) -> Self {
        let ok = low
            .forward
            .complement(length)
            .intersection(&low.reverse.complement(length));
        let low_both = low.forward.intersection(&low.reverse);

        Self {
            sequence: sequence.to_string(),
            low_forward: low.forward,
            low_reverse: low.reverse,
            low_both,
            ok,
        }
    }
}

/// Coverage of every reference sequence, in reference order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CoverageSummary(Vec<SequenceCoverage>);

impl CoverageSummary {
    /// Classify the depth of every reference sequence against `min_cov`
    ///
    /// # Errors
    ///
    /// Returns `QcError::MissingDepth` if a reference sequence has no depth
    /// arrays, or `QcError::DepthLengthMismatch` if an array length differs
    /// from its sequence length.
    pub fn compute(
        layout: &ReferenceLayout,
        depths: &StrandDepths,
        min_cov: u32,
    ) -> Result<Self, QcError> {
        let mut sequences = Vec::with_capacity(layout.len());

        for seq in layout.iter() {
            let per_strand = depths
                .get(&seq.id)
                .ok_or_else(|| QcError::MissingDepth(seq.id.clone()))?;

            for strand in [Strand::Forward, Strand::Reverse] {
                let actual = per_strand.get(strand).len() as u64;
                if actual != seq.length {
                    return Err(QcError::DepthLengthMismatch {
                        sequence: seq.id.clone(),
                        strand,
                        expected: seq.length,
                        actual,
                    });
                }
            }

            let low = per_strand.map(|d| low_coverage_intervals(d, min_cov));
            let coverage = SequenceCoverage::from_low(&seq.id, seq.length, low);
            debug!(
                "{}: {} bases with adequate coverage on both strands",
                seq.id,
                coverage.ok.total_length()
            );
            sequences.push(coverage);
        }

        let ok: u64 = sequences.iter().map(|s| s.ok.total_length()).sum();
        info!(
            "{ok} of {} reference bases have read depth >= {min_cov} on both strands",
            layout.total_length()
        );

        Ok(Self(sequences))
    }

    #[must_use]
    pub fn get(&self, sequence: &str) -> Option<&SequenceCoverage> {
        self.0.iter().find(|s| s.sequence == sequence)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceCoverage> {
        self.0.iter()
    }
}
