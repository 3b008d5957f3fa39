//! # asm-qc
//!
//! A library for evaluating a de novo genome assembly against a known
//! reference.
//!
//! Given alignments of the contigs to the reference, alignments of the
//! reference CDS to the contigs, and read depth on the reference, `asm-qc`
//! answers: which reference bases did the assembly cover, which well-supported
//! bases did it miss, and which genes and sequences came out whole.
//!
//! ## Features
//!
//! - **Contig placement**: unique and repetitive placements of every contig
//! - **Coverage analysis**: low and adequate read depth per strand
//! - **Gap analysis**: reference regions the assembler should have assembled
//! - **CDS scoring**: assembled, and assembled into a single open reading frame
//! - **Sequence scoring**: assembled, and assembled as one contig
//! - **Read disagreement**: assembly bases the mapped reads contradict
//! - **Stats report**: a fixed set of summary counts as text, TSV or JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use asm_qc::qc::pipeline::{analyze, AnalysisInputs, QcConfig};
//! use asm_qc::parsing::coords::parse_coords_file;
//! use asm_qc::parsing::depth::parse_depth_file;
//! use asm_qc::parsing::fasta::{load_reference, read_assembly};
//! use asm_qc::parsing::gff::parse_gff_file;
//! use std::path::Path;
//!
//! let layout = load_reference(Path::new("ref.fa")).unwrap();
//! let depths = parse_depth_file(Path::new("depth.tsv"), &layout).unwrap();
//!
//! let inputs = AnalysisInputs {
//!     annotation: parse_gff_file(Path::new("ref.gff")).unwrap(),
//!     assembly: read_assembly(Path::new("contigs.fa")).unwrap(),
//!     contig_hits: parse_coords_file(Path::new("contigs_vs_ref.coords")).unwrap(),
//!     cds_hits: parse_coords_file(Path::new("cds_vs_contigs.coords")).unwrap(),
//!     layout,
//!     depths,
//!     base_counts: None,
//! };
//!
//! let report = analyze(inputs, &QcConfig::default()).unwrap();
//! println!("{}", report.stats.to_text());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Intervals, alignment hits, reference layout, assembly and CDS types
//! - [`parsing`]: Parsers for coords, FASTA/FAI, GFF3, BAM and depth tables
//! - [`qc`]: The evaluation stages and the pipeline that runs them
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Input validation helpers

pub mod cli;
pub mod core;
pub mod parsing;
pub mod qc;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::hit::AlignmentHit;
pub use core::interval::{Interval, IntervalSet};
pub use core::reference::ReferenceLayout;
pub use core::types::*;
pub use qc::pipeline::{analyze, run, QcConfig, QcInputs, QcReport};
pub use qc::stats::StatsReport;
pub use qc::QcError;
