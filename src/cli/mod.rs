//! Command-line interface for asm-qc.
//!
//! Available commands:
//!
//! - **evaluate**: Score an assembly against a reference from precomputed
//!   alignments and read depth
//! - **extract-cds**: Write the reference CDS sequences as FASTA, named so
//!   that their alignments to the assembly can be fed back to `evaluate`
//!
//! ## Usage
//!
//! ```text
//! # Extract CDS sequences, then align them to the contigs
//! asm-qc extract-cds --reference ref.fa --gff ref.gff --output cds.fa
//! nucmer -p cds_vs_contigs contigs.fa cds.fa
//! show-coords -dTlro cds_vs_contigs.delta > cds_vs_contigs.coords
//!
//! # Evaluate
//! asm-qc evaluate --reference ref.fa --gff ref.gff --assembly contigs.fa \
//!     --contig-hits contigs_vs_ref.coords --cds-hits cds_vs_contigs.coords \
//!     --reads-bam reads_vs_ref.bam --assembly-bam reads_vs_contigs.bam \
//!     --output-prefix qc
//!
//! # JSON output for scripting
//! asm-qc evaluate ... --format json
//! ```

use clap::{Parser, Subcommand};

pub mod evaluate;
pub mod extract_cds;

#[derive(Parser)]
#[command(name = "asm-qc")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Evaluate a genome assembly against a reference")]
#[command(
    long_about = "asm-qc scores a de novo assembly against a known reference.\n\nFrom contig and CDS alignments and read depth it reports:\n- Which reference bases the contigs cover, and which well-covered bases they miss\n- Which reference sequences and CDS were assembled, and assembled correctly\n- How contigs are placed on the reference, including repetitive placements\n- Assembly bases the reads disagree with"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate an assembly against a reference
    Evaluate(evaluate::EvaluateArgs),

    /// Write reference CDS sequences as FASTA
    ExtractCds(extract_cds::ExtractCdsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
