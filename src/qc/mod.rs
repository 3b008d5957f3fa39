//! Assembly evaluation engine.
//!
//! Each stage is a function from the frozen output of earlier stages to a new
//! record, so a stage cannot run before its inputs exist:
//!
//! 1. [`hits::ContigHits`] / [`hits::CdsHits`]: parsed alignment hits checked
//!    against the reference, the annotation and the assembly
//! 2. [`placement::ContigPlacements`]: unique vs. repetitive placement of each
//!    contig on the reference
//! 3. [`coverage::CoverageSummary`]: low and adequate read coverage per strand
//! 4. [`gaps::GapAnalysis`]: reference regions covered by contigs, missed, and
//!    missed despite good read support
//! 5. [`scoring::CdsScores`] / [`scoring::RefSeqScores`]: assembled and
//!    assembled-correctly calls per CDS and per reference sequence
//! 6. [`stats::StatsReport`]: the fixed-key summary
//!
//! [`pipeline::run`] wires the stages to files on disk; [`pipeline::analyze`]
//! runs them over in-memory inputs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use asm_qc::qc::pipeline::{run, DepthSource, QcConfig, QcInputs};
//! use std::path::PathBuf;
//!
//! let inputs = QcInputs {
//!     reference: PathBuf::from("ref.fa"),
//!     gff: PathBuf::from("ref.gff"),
//!     assembly: PathBuf::from("contigs.fa"),
//!     contig_hits: Some(PathBuf::from("contigs_vs_ref.coords")),
//!     cds_hits: Some(PathBuf::from("cds_vs_contigs.coords")),
//!     depth: Some(DepthSource::ReadsBam(PathBuf::from("reads_vs_ref.bam"))),
//!     assembly_bam: Some(PathBuf::from("reads_vs_contigs.bam")),
//! };
//!
//! let report = run(&inputs, &QcConfig::default()).unwrap();
//! for (key, value) in report.stats.entries() {
//!     println!("{key}\t{value}");
//! }
//! ```

use thiserror::Error;

use crate::core::interval::Interval;
use crate::core::types::Strand;
use crate::parsing::ParseError;
use crate::utils::validation::ConfigError;

pub mod cds;
pub mod classify;
pub mod coverage;
pub mod disagreement;
pub mod gaps;
pub mod hits;
pub mod orf;
pub mod pipeline;
pub mod placement;
pub mod scoring;
pub mod stats;

#[derive(Error, Debug)]
pub enum QcError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("CDS '{0}' is recorded more than once")]
    DuplicateCds(String),

    #[error("Alignment hit refers to CDS '{0}', which is not in the annotation")]
    UnknownCds(String),

    #[error("Alignment hit refers to contig '{0}', which is not in the assembly")]
    UnknownContig(String),

    #[error("Alignment hit refers to reference sequence '{0}', which is not in the reference")]
    UnknownReference(String),

    #[error("Interval {interval} lies outside '{sequence}' (length {length})")]
    OutOfBounds {
        sequence: String,
        interval: Interval,
        length: u64,
    },

    #[error("No read depth for reference sequence '{0}'")]
    MissingDepth(String),

    #[error("{strand} strand depth for '{sequence}' has {actual} positions, expected {expected}")]
    DepthLengthMismatch {
        sequence: String,
        strand: Strand,
        expected: u64,
        actual: u64,
    },
}
