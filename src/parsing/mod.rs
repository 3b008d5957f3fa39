//! Parsers for the files produced by external collaborators.
//!
//! This module provides parsers for:
//!
//! - **nucmer coordinates** (`show-coords -dTlro`): alignment hits between
//!   two FASTA files
//! - **FASTA index (.fai) files**: reference sequence names and lengths
//! - **FASTA files**: reference and assembly sequences (plain or gzip)
//! - **GFF3 annotation**: CDS feature coordinates
//! - **BAM files**: per-strand read depth and per-base read support
//! - **Depth tables**: precomputed per-strand depth as TSV
//!
//! ## Example
//!
//! ```rust,no_run
//! use asm_qc::parsing::coords::parse_coords_file;
//! use std::path::Path;
//!
//! let hits = parse_coords_file(Path::new("assembly_vs_ref.coords")).unwrap();
//! for (contig, contig_hits) in hits.iter() {
//!     println!("{contig}: {} hits", contig_hits.len());
//! }
//! ```

use thiserror::Error;

pub mod bam;
pub mod coords;
pub mod depth;
pub mod fai;
pub mod fasta;
pub mod gff;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}
