//! Contig positions where the reads mapped back to the assembly favour a
//! different base than the one the assembler called.

use serde::Serialize;
use tracing::info;

use crate::core::assembly::Assembly;
use crate::parsing::bam::{base_index, BaseCounts};

/// True if the position has read support and `called` is not a most frequent
/// read base. Ties with the call count as agreement.
#[must_use]
pub fn position_disagrees(called: u8, counts: &[u32; 4]) -> bool {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return false;
    }
    match base_index(called) {
        Some(i) => counts[i] < max,
        None => true,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContigDisagreement {
    pub contig: String,

    /// 0-based positions
    pub positions: Vec<u64>,
}

/// Disagreeing positions per contig, in assembly order. Contigs with none are
/// left out.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReadDisagreement(Vec<ContigDisagreement>);

impl ReadDisagreement {
    /// No reads, no disagreement
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compute(assembly: &Assembly, counts: &BaseCounts) -> Self {
        let contigs: Vec<ContigDisagreement> = assembly
            .iter()
            .filter_map(|contig| {
                let contig_counts = counts.get(&contig.name)?;
                let positions: Vec<u64> = contig
                    .sequence
                    .iter()
                    .zip(contig_counts)
                    .enumerate()
                    .filter(|(_, (called, pos_counts))| position_disagrees(**called, pos_counts))
                    .map(|(pos, _)| pos as u64)
                    .collect();
                (!positions.is_empty()).then(|| ContigDisagreement {
                    contig: contig.name.clone(),
                    positions,
                })
            })
            .collect();

        let disagreement = Self(contigs);
        info!(
            "{} assembly bases disagree with the reads",
            disagreement.total()
        );
        disagreement
    }

    /// Number of disagreeing positions over all contigs
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| c.positions.len() as u64).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContigDisagreement> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::AssemblyContig;

    #[test]
    fn test_position_disagrees() {
        assert!(!position_disagrees(b'A', &[5, 0, 1, 0]));
        assert!(position_disagrees(b'A', &[1, 0, 5, 0]));
        assert!(!position_disagrees(b'c', &[0, 3, 3, 0]));
        assert!(!position_disagrees(b'A', &[0, 0, 0, 0]));
        assert!(position_disagrees(b'N', &[0, 0, 2, 0]));
        assert!(!position_disagrees(b'N', &[0, 0, 0, 0]));
    }

    #[test]
    fn test_compute() {
        let assembly = Assembly::new(vec![
            AssemblyContig::new("ctg1", b"ACGT".to_vec()),
            AssemblyContig::new("ctg2", b"AA".to_vec()),
            AssemblyContig::new("ctg3", b"AA".to_vec()),
        ]);
        let counts: BaseCounts = [
            (
                "ctg1".to_string(),
                vec![[4, 0, 0, 0], [0, 0, 4, 0], [0, 0, 0, 0], [0, 1, 0, 3]],
            ),
            ("ctg2".to_string(), vec![[2, 0, 0, 0], [2, 0, 0, 0]]),
        ]
        .into_iter()
        .collect();

        let disagreement = ReadDisagreement::compute(&assembly, &counts);
        assert_eq!(disagreement.total(), 1);
        let contigs: Vec<&ContigDisagreement> = disagreement.iter().collect();
        assert_eq!(contigs.len(), 1);
        assert_eq!(contigs[0].contig, "ctg1");
        assert_eq!(contigs[0].positions, vec![1]);
    }
}
