//! The fixed-key summary of a run.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::assembly::Assembly;
use crate::core::interval::IntervalSet;
use crate::core::reference::ReferenceLayout;
use crate::qc::disagreement::ReadDisagreement;
use crate::qc::gaps::GapAnalysis;
use crate::qc::hits::ContigHits;
use crate::qc::scoring::{CdsScores, RefSeqScores};

/// Stats keys in output order
pub const STATS_KEYS: [&str; 14] = [
    "ref_bases",
    "ref_sequences",
    "ref_bases_assembled",
    "ref_sequences_assembled",
    "ref_sequences_assembled_ok",
    "ref_bases_assembler_missed",
    "assembly_bases",
    "assembly_bases_in_ref",
    "assembly_contigs",
    "assembly_contigs_hit_ref",
    "assembly_bases_reads_disagree",
    "cds_number",
    "cds_assembled",
    "cds_assembled_ok",
];

/// Every stage output the summary is folded from
pub struct StageOutputs<'a> {
    pub layout: &'a ReferenceLayout,
    pub assembly: &'a Assembly,
    pub contig_hits: &'a ContigHits,
    pub gaps: &'a GapAnalysis,
    pub refseqs: &'a RefSeqScores,
    pub cds: &'a CdsScores,
    pub disagreement: &'a ReadDisagreement,
}

/// Summary counts of one run. Fields serialize in [`STATS_KEYS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub ref_bases: u64,
    pub ref_sequences: u64,
    pub ref_bases_assembled: u64,
    pub ref_sequences_assembled: u64,
    pub ref_sequences_assembled_ok: u64,
    pub ref_bases_assembler_missed: u64,
    pub assembly_bases: u64,
    pub assembly_bases_in_ref: u64,
    pub assembly_contigs: u64,
    pub assembly_contigs_hit_ref: u64,
    pub assembly_bases_reads_disagree: u64,
    pub cds_number: u64,
    pub cds_assembled: u64,
    pub cds_assembled_ok: u64,
}

impl StatsReport {
    #[must_use]
    pub fn aggregate(stages: &StageOutputs<'_>) -> Self {
        // Contig bases that align to the reference, each base counted once
        let assembly_bases_in_ref = stages
            .contig_hits
            .iter()
            .map(|(_, hits)| {
                hits.iter()
                    .map(|hit| hit.query_interval())
                    .collect::<IntervalSet>()
                    .total_length()
            })
            .sum();

        Self {
            ref_bases: stages.layout.total_length(),
            ref_sequences: stages.layout.len() as u64,
            ref_bases_assembled: stages.gaps.bases_covered(),
            ref_sequences_assembled: stages.refseqs.assembled_count() as u64,
            ref_sequences_assembled_ok: stages.refseqs.assembled_ok_count() as u64,
            ref_bases_assembler_missed: stages.gaps.bases_missed(),
            assembly_bases: stages.assembly.total_bases(),
            assembly_bases_in_ref,
            assembly_contigs: stages.assembly.contig_count() as u64,
            assembly_contigs_hit_ref: stages.contig_hits.contig_count() as u64,
            assembly_bases_reads_disagree: stages.disagreement.total(),
            cds_number: stages.cds.len() as u64,
            cds_assembled: stages.cds.assembled_count() as u64,
            cds_assembled_ok: stages.cds.assembled_ok_count() as u64,
        }
    }

    /// `(key, value)` pairs in output order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, u64); 14] {
        let values = [
            self.ref_bases,
            self.ref_sequences,
            self.ref_bases_assembled,
            self.ref_sequences_assembled,
            self.ref_sequences_assembled_ok,
            self.ref_bases_assembler_missed,
            self.assembly_bases,
            self.assembly_bases_in_ref,
            self.assembly_contigs,
            self.assembly_contigs_hit_ref,
            self.assembly_bases_reads_disagree,
            self.cds_number,
            self.cds_assembled,
            self.cds_assembled_ok,
        ];
        let mut entries = [("", 0u64); 14];
        for (entry, (key, value)) in entries.iter_mut().zip(STATS_KEYS.iter().zip(values)) {
            *entry = (*key, value);
        }
        entries
    }

    /// One `key<TAB>value` line per stat
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.entries() {
            let _ = writeln!(out, "{key}\t{value}");
        }
        out
    }

    /// A header row of keys and a row of values
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let entries = self.entries();
        let header: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
        let values: Vec<String> = entries.iter().map(|(_, value)| value.to_string()).collect();
        format!("{}\n{}\n", header.join("\t"), values.join("\t"))
    }
}
