//! Reference regions covered and missed by the assembly.

use serde::Serialize;
use tracing::info;

use crate::core::interval::IntervalSet;
use crate::core::reference::ReferenceLayout;
use crate::qc::coverage::CoverageSummary;
use crate::qc::hits::ContigHits;
use crate::qc::QcError;

#[derive(Debug, Clone, Serialize)]
pub struct SequenceGaps {
    pub sequence: String,
    pub covered_by_contigs: IntervalSet,
    pub not_covered_by_contigs: IntervalSet,

    /// Missed by the contigs despite adequate read coverage on both strands
    pub should_have_assembled: IntervalSet,
}

/// Gap analysis of every reference sequence, in reference order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GapAnalysis(Vec<SequenceGaps>);

impl GapAnalysis {
    /// # Errors
    ///
    /// Returns `QcError::MissingDepth` if `coverage` has no entry for a
    /// reference sequence.
    pub fn compute(
        layout: &ReferenceLayout,
        hits: &ContigHits,
        coverage: &CoverageSummary,
    ) -> Result<Self, QcError> {
        let by_reference = hits.as_hits().by_reference();

        let mut sequences = Vec::with_capacity(layout.len());
        for seq in layout.iter() {
            let covered: IntervalSet = by_reference
                .get(seq.id.as_str())
                .into_iter()
                .flatten()
                .map(|hit| hit.ref_interval())
                .collect();
            let not_covered = covered.complement(seq.length);

            let ok = &coverage
                .get(&seq.id)
                .ok_or_else(|| QcError::MissingDepth(seq.id.clone()))?
                .ok;
            let should_have_assembled = not_covered.intersection(ok);

            sequences.push(SequenceGaps {
                sequence: seq.id.clone(),
                covered_by_contigs: covered,
                not_covered_by_contigs: not_covered,
                should_have_assembled,
            });
        }

        let analysis = Self(sequences);
        info!(
            "Contigs cover {} reference bases; {} well-covered bases were not assembled",
            analysis.bases_covered(),
            analysis.bases_missed()
        );
        Ok(analysis)
    }

    #[must_use]
    pub fn get(&self, sequence: &str) -> Option<&SequenceGaps> {
        self.0.iter().find(|s| s.sequence == sequence)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceGaps> {
        self.0.iter()
    }

    /// Reference bases covered by at least one contig
    #[must_use]
    pub fn bases_covered(&self) -> u64 {
        self.0.iter().map(|s| s.covered_by_contigs.total_length()).sum()
    }

    /// Reference bases the assembler should have assembled but did not
    #[must_use]
    pub fn bases_missed(&self) -> u64 {
        self.0
            .iter()
            .map(|s| s.should_have_assembled.total_length())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::{Assembly, AssemblyContig};
    use crate::core::hit::AlignmentHit;
    use crate::core::interval::Interval;
    use crate::core::types::Stranded;
    use crate::parsing::bam::StrandDepths;
    use crate::parsing::coords::HitsByQuery;

    fn coverage(layout: &ReferenceLayout, forward: Vec<u32>, reverse: Vec<u32>) -> CoverageSummary {
        let depths: StrandDepths = [("ref1".to_string(), Stranded::new(forward, reverse))]
            .into_iter()
            .collect();
        CoverageSummary::compute(layout, &depths, 5).unwrap()
    }

    #[test]
    fn test_empty_assembly_misses_everything() {
        let layout = ReferenceLayout::from_lengths(vec![("ref1", 1000)]).unwrap();
        let mut forward = vec![10u32; 1000];
        forward[100..200].fill(0);
        let coverage = coverage(&layout, forward, vec![10u32; 1000]);

        let gaps = GapAnalysis::compute(&layout, &ContigHits::none(), &coverage).unwrap();
        let ref1 = gaps.get("ref1").unwrap();
        assert!(ref1.covered_by_contigs.is_empty());
        assert_eq!(ref1.not_covered_by_contigs.as_slice(), &[Interval::new(0, 999)]);
        assert_eq!(ref1.should_have_assembled, coverage.get("ref1").unwrap().ok);
        assert_eq!(gaps.bases_covered(), 0);
        assert_eq!(gaps.bases_missed(), 900);
    }

    #[test]
    fn test_overlapping_hits_are_merged() {
        let layout = ReferenceLayout::from_lengths(vec![("ref1", 100)]).unwrap();
        let hits: HitsByQuery = vec![
            AlignmentHit::new("ctg1", (0, 29), "ref1", (0, 29)),
            AlignmentHit::new("ctg2", (0, 19), "ref1", (49, 30)),
            AlignmentHit::new("ctg3", (0, 9), "ref1", (40, 49)),
        ]
        .into_iter()
        .collect();
        let assembly = Assembly::new(vec![
            AssemblyContig::new("ctg1", vec![b'A'; 30]),
            AssemblyContig::new("ctg2", vec![b'A'; 20]),
            AssemblyContig::new("ctg3", vec![b'A'; 10]),
        ]);
        let hits = ContigHits::validate(hits, &assembly, &layout).unwrap();

        let mut forward = vec![10u32; 100];
        forward[90..].fill(0);
        let coverage = coverage(&layout, forward, vec![10u32; 100]);

        let gaps = GapAnalysis::compute(&layout, &hits, &coverage).unwrap();
        let ref1 = gaps.get("ref1").unwrap();
        assert_eq!(ref1.covered_by_contigs.as_slice(), &[Interval::new(0, 49)]);
        assert_eq!(ref1.not_covered_by_contigs.as_slice(), &[Interval::new(50, 99)]);
        assert_eq!(ref1.should_have_assembled.as_slice(), &[Interval::new(50, 89)]);
        assert_eq!(gaps.bases_covered(), 50);
        assert_eq!(gaps.bases_missed(), 40);
    }
}
