//! Runs every stage, in order, from files on disk or from parsed inputs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::assembly::Assembly;
use crate::core::reference::ReferenceLayout;
use crate::parsing::bam::{read_base_counts, read_strand_depths, BaseCounts, StrandDepths};
use crate::parsing::coords::{parse_coords_file, HitsByQuery};
use crate::parsing::depth::parse_depth_file;
use crate::parsing::fasta::{load_reference, read_assembly};
use crate::parsing::gff::{parse_gff_file, CdsBySequence};
use crate::parsing::ParseError;
use crate::qc::cds::CdsCatalog;
use crate::qc::coverage::CoverageSummary;
use crate::qc::disagreement::ReadDisagreement;
use crate::qc::gaps::GapAnalysis;
use crate::qc::hits::{CdsHits, ContigHits};
use crate::qc::placement::ContigPlacements;
use crate::qc::scoring::{CdsScores, RefSeqScores};
use crate::qc::stats::{StageOutputs, StatsReport};
use crate::qc::QcError;
use crate::utils::validation::{
    at_most_one, check_file_exists, check_optional_file, require, ConfigError,
};

/// Default minimum per-strand read depth for a reference position to count as
/// well covered
pub const DEFAULT_MIN_REF_COV: u32 = 5;

const WHEN_ASSEMBLY_NOT_EMPTY: &str = " when the assembly is not empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QcConfig {
    /// Positions with read depth below this on either strand are low coverage
    pub min_ref_cov: u32,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            min_ref_cov: DEFAULT_MIN_REF_COV,
        }
    }
}

/// Where per-strand read depth on the reference comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthSource {
    /// Coordinate-sorted BAM of reads mapped to the reference
    ReadsBam(PathBuf),

    /// Precomputed `name pos fwd rev` table
    Table(PathBuf),
}

impl DepthSource {
    /// Pick the depth source from the two mutually exclusive options
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Conflicting` if both are given.
    pub fn from_options(
        reads_bam: Option<PathBuf>,
        table: Option<PathBuf>,
    ) -> Result<Option<Self>, ConfigError> {
        at_most_one(
            ("--reads-bam", reads_bam.map(Self::ReadsBam)),
            ("--depth", table.map(Self::Table)),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::ReadsBam(path) | Self::Table(path) => path,
        }
    }

    fn load(&self, layout: &ReferenceLayout) -> Result<StrandDepths, ParseError> {
        match self {
            Self::ReadsBam(path) => read_strand_depths(path, layout),
            Self::Table(path) => parse_depth_file(path, layout),
        }
    }
}

/// Input files of one run
#[derive(Debug, Clone, Serialize)]
pub struct QcInputs {
    pub reference: PathBuf,
    pub gff: PathBuf,
    pub assembly: PathBuf,

    /// Contigs (query) aligned to the reference
    pub contig_hits: Option<PathBuf>,

    /// Reference CDS (query) aligned to the contigs
    pub cds_hits: Option<PathBuf>,

    pub depth: Option<DepthSource>,

    /// Reads mapped to the assembly. Without it no read disagreement is
    /// reported.
    pub assembly_bam: Option<PathBuf>,
}

impl QcInputs {
    /// Check that every required input is given and every given file exists.
    /// Inputs needed only for a non-empty assembly are checked by [`run`] once
    /// the assembly is read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first missing input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_file_exists("reference", &self.reference)?;
        check_file_exists("annotation", &self.gff)?;
        check_file_exists("assembly", &self.assembly)?;

        let depth = require("--reads-bam or --depth", "", self.depth.as_ref())?;
        check_file_exists("read depth", depth.path())?;

        check_optional_file("contig hits", self.contig_hits.as_deref())?;
        check_optional_file("CDS hits", self.cds_hits.as_deref())?;
        check_optional_file("assembly BAM", self.assembly_bam.as_deref())?;
        Ok(())
    }
}

/// Parsed inputs of one run
#[derive(Debug, Clone, Default)]
pub struct AnalysisInputs {
    pub layout: ReferenceLayout,
    pub annotation: CdsBySequence,
    pub assembly: Assembly,
    pub contig_hits: HitsByQuery,
    pub cds_hits: HitsByQuery,
    pub depths: StrandDepths,

    /// Read support per contig position, when reads were mapped to the
    /// assembly
    pub base_counts: Option<BaseCounts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub tool_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub config: QcConfig,

    /// Present when the run started from files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<QcInputs>,
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct QcReport {
    pub metadata: RunMetadata,
    pub stats: StatsReport,
    pub reference: ReferenceLayout,
    pub refseqs: RefSeqScores,
    pub coverage: CoverageSummary,
    pub gaps: GapAnalysis,
    pub placements: ContigPlacements,

    /// Contig names in reference layout order
    pub plot_order: Vec<String>,
    pub cds: CdsScores,
    pub disagreement: ReadDisagreement,
}

/// Run every stage over parsed inputs
///
/// # Errors
///
/// Returns `QcError` if the inputs contradict each other: hits naming unknown
/// sequences or lying out of bounds, duplicate CDS, or depth arrays that do
/// not match the reference.
pub fn analyze(inputs: AnalysisInputs, config: &QcConfig) -> Result<QcReport, QcError> {
    let AnalysisInputs {
        layout,
        annotation,
        assembly,
        contig_hits,
        cds_hits,
        depths,
        base_counts,
    } = inputs;

    let catalog = CdsCatalog::from_annotation(&layout, &annotation)?;

    let (contig_hits, cds_hits) = if assembly.is_empty() {
        if !contig_hits.is_empty() || !cds_hits.is_empty() {
            warn!("Assembly is empty; ignoring alignment hits");
        }
        (ContigHits::none(), CdsHits::none())
    } else {
        (
            ContigHits::validate(contig_hits, &assembly, &layout)?,
            CdsHits::validate(cds_hits, &catalog, &assembly)?,
        )
    };

    let placements = ContigPlacements::compute(&contig_hits);
    let plot_order = placements.plot_order(&layout);
    let coverage = CoverageSummary::compute(&layout, &depths, config.min_ref_cov)?;
    let gaps = GapAnalysis::compute(&layout, &contig_hits, &coverage)?;
    let refseqs = RefSeqScores::compute(&layout, &contig_hits);
    let cds = CdsScores::compute(&catalog, &cds_hits, &assembly)?;
    let disagreement = base_counts.map_or_else(ReadDisagreement::none, |counts| {
        ReadDisagreement::compute(&assembly, &counts)
    });

    let stats = StatsReport::aggregate(&StageOutputs {
        layout: &layout,
        assembly: &assembly,
        contig_hits: &contig_hits,
        gaps: &gaps,
        refseqs: &refseqs,
        cds: &cds,
        disagreement: &disagreement,
    });

    Ok(QcReport {
        metadata: RunMetadata {
            tool_version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now(),
            config: *config,
            inputs: None,
        },
        stats,
        reference: layout,
        refseqs,
        coverage,
        gaps,
        placements,
        plot_order,
        cds,
        disagreement,
    })
}

/// Read the input files and run every stage
///
/// # Errors
///
/// Returns `QcError::Config` if inputs are missing, `QcError::Parse` if a file
/// cannot be parsed, or another `QcError` if the inputs contradict each other.
pub fn run(inputs: &QcInputs, config: &QcConfig) -> Result<QcReport, QcError> {
    inputs.validate()?;

    let layout = load_reference(&inputs.reference)?;
    info!(
        "Reference has {} sequences, {} bases",
        layout.len(),
        layout.total_length()
    );

    let annotation = parse_gff_file(&inputs.gff)?;

    let assembly = read_assembly(&inputs.assembly)?;
    info!(
        "Assembly has {} contigs, {} bases",
        assembly.contig_count(),
        assembly.total_bases()
    );

    let (contig_hits, cds_hits, base_counts) = if assembly.is_empty() {
        info!("Assembly is empty; every reference base counts as missed");
        (HitsByQuery::new(), HitsByQuery::new(), None)
    } else {
        let contig_path = require(
            "--contig-hits",
            WHEN_ASSEMBLY_NOT_EMPTY,
            inputs.contig_hits.as_deref(),
        )?;
        let cds_path = require(
            "--cds-hits",
            WHEN_ASSEMBLY_NOT_EMPTY,
            inputs.cds_hits.as_deref(),
        )?;
        let base_counts = match inputs.assembly_bam.as_deref() {
            Some(bam_path) => Some(read_base_counts(bam_path, &assembly)?),
            None => {
                warn!("No --assembly-bam given; read disagreement is not checked");
                None
            }
        };

        (
            parse_coords_file(contig_path)?,
            parse_coords_file(cds_path)?,
            base_counts,
        )
    };

    // validate() has checked a depth source is present
    let depth = require("--reads-bam or --depth", "", inputs.depth.as_ref())?;
    info!("Reading read depth from {}", depth.path().display());
    let depths = depth.load(&layout)?;

    let mut report = analyze(
        AnalysisInputs {
            layout,
            annotation,
            assembly,
            contig_hits,
            cds_hits,
            depths,
            base_counts,
        },
        config,
    )?;
    report.metadata.inputs = Some(inputs.clone());

    info!(
        "Done: {} of {} reference bases assembled",
        report.stats.ref_bases_assembled, report.stats.ref_bases
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::AssemblyContig;
    use crate::core::cds::CdsFeature;
    use crate::core::hit::AlignmentHit;
    use crate::core::interval::Interval;
    use crate::core::types::{Strand, Stranded};

    fn layout() -> ReferenceLayout {
        ReferenceLayout::from_lengths(vec![("ref1", 1000)]).unwrap()
    }

    fn flat_depths(layout: &ReferenceLayout, depth: u32) -> StrandDepths {
        layout
            .iter()
            .map(|seq| {
                let d = vec![depth; seq.length as usize];
                (seq.id.clone(), Stranded::new(d.clone(), d))
            })
            .collect()
    }

    fn annotation() -> CdsBySequence {
        [(
            "ref1".to_string(),
            vec![CdsFeature::new("ref1", Interval::new(99, 398), Strand::Forward)],
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_assembly_report_is_complete() {
        let layout = layout();
        let depths = flat_depths(&layout, 10);
        let report = analyze(
            AnalysisInputs {
                layout,
                annotation: annotation(),
                depths,
                ..AnalysisInputs::default()
            },
            &QcConfig::default(),
        )
        .unwrap();

        let gaps = report.gaps.get("ref1").unwrap();
        assert_eq!(gaps.not_covered_by_contigs.as_slice(), &[Interval::new(0, 999)]);
        assert_eq!(
            gaps.should_have_assembled,
            report.coverage.get("ref1").unwrap().ok
        );

        let ref1 = report.refseqs.get("ref1").unwrap();
        assert!(!ref1.assembled);
        assert!(!ref1.assembled_ok);

        assert_eq!(report.stats.ref_bases, 1000);
        assert_eq!(report.stats.ref_bases_assembled, 0);
        assert_eq!(report.stats.ref_bases_assembler_missed, 1000);
        assert_eq!(report.stats.assembly_contigs, 0);
        assert_eq!(report.stats.cds_number, 1);
        assert_eq!(report.stats.cds_assembled, 0);
        assert!(report.plot_order.is_empty());
    }

    #[test]
    fn test_empty_assembly_ignores_hits() {
        let layout = layout();
        let depths = flat_depths(&layout, 10);
        let contig_hits: HitsByQuery = vec![AlignmentHit::new("ctg1", (0, 99), "ref1", (0, 99))]
            .into_iter()
            .collect();

        let report = analyze(
            AnalysisInputs {
                layout,
                depths,
                contig_hits,
                ..AnalysisInputs::default()
            },
            &QcConfig::default(),
        )
        .unwrap();
        assert_eq!(report.stats.assembly_contigs_hit_ref, 0);
    }

    #[test]
    fn test_full_analysis() {
        let layout = layout();
        let mut depths = flat_depths(&layout, 10);
        if let Some(ref1) = depths.get_mut("ref1") {
            ref1.reverse[950..].fill(1);
        }

        let mut contig = b"CC".to_vec();
        contig.extend(b"ATG".repeat(99));
        contig.extend_from_slice(b"TAA");
        contig.extend(b"CTAG".repeat(150));
        let assembly = Assembly::new(vec![
            AssemblyContig::new("ctg1", contig),
            AssemblyContig::new("ctg2", b"ACGT".repeat(10)),
        ]);

        let contig_hits: HitsByQuery = vec![AlignmentHit::new("ctg1", (0, 799), "ref1", (50, 849))]
            .into_iter()
            .collect();
        let cds_hits: HitsByQuery =
            vec![AlignmentHit::new("ref1:100-399:+", (0, 299), "ctg1", (2, 301))]
                .into_iter()
                .collect();

        let report = analyze(
            AnalysisInputs {
                layout,
                annotation: annotation(),
                assembly,
                contig_hits,
                cds_hits,
                depths,
                base_counts: None,
            },
            &QcConfig::default(),
        )
        .unwrap();

        let stats = report.stats;
        assert_eq!(stats.ref_bases_assembled, 800);
        // 0-49 and 850-949 are well covered; 950-999 is low on the reverse strand
        assert_eq!(stats.ref_bases_assembler_missed, 150);
        assert_eq!(stats.ref_sequences_assembled, 0);
        assert_eq!(stats.assembly_bases, 902 + 40);
        assert_eq!(stats.assembly_bases_in_ref, 800);
        assert_eq!(stats.assembly_contigs, 2);
        assert_eq!(stats.assembly_contigs_hit_ref, 1);
        assert_eq!(stats.assembly_bases_reads_disagree, 0);
        assert_eq!(stats.cds_number, 1);
        assert_eq!(stats.cds_assembled, 1);
        assert_eq!(stats.cds_assembled_ok, 1);
        assert_eq!(report.plot_order, vec!["ctg1"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["cds_assembled_ok"], 1);
        assert_eq!(json["metadata"]["config"]["min_ref_cov"], 5);
    }

    #[test]
    fn test_unknown_contig_in_cds_hits_fails() {
        let layout = layout();
        let depths = flat_depths(&layout, 10);
        let cds_hits: HitsByQuery =
            vec![AlignmentHit::new("ref1:100-399:+", (0, 299), "ctg9", (0, 299))]
                .into_iter()
                .collect();

        let result = analyze(
            AnalysisInputs {
                layout,
                annotation: annotation(),
                assembly: Assembly::new(vec![AssemblyContig::new("ctg1", vec![b'A'; 400])]),
                cds_hits,
                depths,
                ..AnalysisInputs::default()
            },
            &QcConfig::default(),
        );
        assert!(matches!(result, Err(QcError::UnknownContig(name)) if name == "ctg9"));
    }

    #[test]
    fn test_contig_hits_must_match_assembly() {
        let analyze_with = |contig_hits: HitsByQuery| {
            let layout = layout();
            let depths = flat_depths(&layout, 10);
            analyze(
                AnalysisInputs {
                    layout,
                    assembly: Assembly::new(vec![AssemblyContig::new("ctg1", vec![b'A'; 100])]),
                    contig_hits,
                    depths,
                    ..AnalysisInputs::default()
                },
                &QcConfig::default(),
            )
        };

        let unknown: HitsByQuery = vec![
            AlignmentHit::new("ctg1", (0, 99), "ref1", (0, 99)),
            AlignmentHit::new("ghost", (0, 4999), "ref1", (0, 999)),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            analyze_with(unknown),
            Err(QcError::UnknownContig(name)) if name == "ghost"
        ));

        let too_long: HitsByQuery = vec![AlignmentHit::new("ctg1", (0, 199), "ref1", (0, 199))]
            .into_iter()
            .collect();
        assert!(matches!(
            analyze_with(too_long),
            Err(QcError::OutOfBounds { sequence, .. }) if sequence == "ctg1"
        ));
    }

    #[test]
    fn test_depth_source_from_options() {
        assert_eq!(DepthSource::from_options(None, None).unwrap(), None);
        assert_eq!(
            DepthSource::from_options(Some("r.bam".into()), None).unwrap(),
            Some(DepthSource::ReadsBam("r.bam".into()))
        );
        assert!(matches!(
            DepthSource::from_options(Some("r.bam".into()), Some("d.tsv".into())),
            Err(ConfigError::Conflicting { .. })
        ));
    }

    #[test]
    fn test_validate_requires_depth() {
        let dir = tempfile::tempdir().unwrap();
        let touch = |name: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, "").unwrap();
            path
        };
        let mut inputs = QcInputs {
            reference: touch("ref.fa"),
            gff: touch("ref.gff"),
            assembly: touch("contigs.fa"),
            contig_hits: None,
            cds_hits: None,
            depth: None,
            assembly_bam: None,
        };
        assert!(matches!(
            inputs.validate(),
            Err(ConfigError::MissingInput { .. })
        ));

        inputs.depth = Some(DepthSource::Table(touch("depth.tsv")));
        assert!(inputs.validate().is_ok());

        inputs.cds_hits = Some(dir.path().join("missing.coords"));
        assert!(matches!(
            inputs.validate(),
            Err(ConfigError::FileNotFound { .. })
        ));
    }
}
