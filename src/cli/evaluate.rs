use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::qc::pipeline::{run as run_qc, DepthSource, QcConfig, QcInputs, QcReport, DEFAULT_MIN_REF_COV};

#[derive(Args)]
pub struct EvaluateArgs {
    /// Reference FASTA (an adjacent .fai is used for lengths when present)
    #[arg(long)]
    pub reference: PathBuf,

    /// GFF3 annotation of the reference; CDS features are scored
    #[arg(long)]
    pub gff: PathBuf,

    /// Assembly FASTA; may be empty
    #[arg(long)]
    pub assembly: PathBuf,

    /// Contigs aligned to the reference (`show-coords -dTlro`)
    #[arg(long)]
    pub contig_hits: Option<PathBuf>,

    /// Extracted CDS aligned to the contigs (`show-coords -dTlro`)
    #[arg(long)]
    pub cds_hits: Option<PathBuf>,

    /// Coordinate-sorted BAM of reads mapped to the reference
    #[arg(long, conflicts_with = "depth")]
    pub reads_bam: Option<PathBuf>,

    /// Per-strand depth table (`name pos fwd rev`) instead of --reads-bam
    #[arg(long)]
    pub depth: Option<PathBuf>,

    /// BAM of reads mapped to the assembly, for read disagreement
    #[arg(long)]
    pub assembly_bam: Option<PathBuf>,

    /// Minimum read depth on each strand for a reference base to count as
    /// well covered
    #[arg(long, default_value_t = DEFAULT_MIN_REF_COV)]
    pub min_ref_cov: u32,

    /// Also write <prefix>.stats.txt, <prefix>.stats.tsv and <prefix>.qc.json
    #[arg(short, long)]
    pub output_prefix: Option<PathBuf>,
}

/// Execute evaluate subcommand
///
/// # Errors
///
/// Returns an error if inputs are missing or invalid, or if output files
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: EvaluateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let inputs = QcInputs {
        reference: args.reference,
        gff: args.gff,
        assembly: args.assembly,
        contig_hits: args.contig_hits,
        cds_hits: args.cds_hits,
        depth: DepthSource::from_options(args.reads_bam, args.depth)?,
        assembly_bam: args.assembly_bam,
    };
    let config = QcConfig {
        min_ref_cov: args.min_ref_cov,
    };

    let report = run_qc(&inputs, &config)?;

    if let Some(prefix) = &args.output_prefix {
        let written = write_outputs(&report, prefix)?;
        if verbose {
            for path in &written {
                eprintln!("Wrote {}", path.display());
            }
        }
    }

    match format {
        OutputFormat::Text => print_text_results(&report, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print!("{}", report.stats.to_tsv()),
    }

    Ok(())
}

/// `<prefix><suffix>`, keeping any directory part of the prefix
fn prefixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn write_outputs(report: &QcReport, prefix: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let outputs = [
        (prefixed(prefix, ".stats.txt"), report.stats.to_text()),
        (prefixed(prefix, ".stats.tsv"), report.stats.to_tsv()),
        (
            prefixed(prefix, ".qc.json"),
            serde_json::to_string_pretty(report)? + "\n",
        ),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (path, content) in outputs {
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn print_text_results(report: &QcReport, verbose: bool) {
    print!("{}", report.stats.to_text());

    if !verbose {
        return;
    }

    println!("\nReference sequences:");
    for record in report.refseqs.iter() {
        println!(
            "  {}\tlength={}\thits={}\tbases_assembled={}\tassembled={}\tassembled_ok={}",
            record.sequence,
            record.length,
            record.hit_count,
            record.bases_assembled,
            record.assembled,
            record.assembled_ok
        );
    }

    if !report.cds.is_empty() {
        println!("\nCDS:");
        for record in report.cds.iter() {
            println!(
                "  {}\thits={}\tbases_assembled={}\tassembled={}\tassembled_ok={}",
                record.id,
                record.number_of_contig_hits,
                record.bases_assembled,
                record.assembled,
                record.assembled_ok
            );
        }
    }

    if !report.plot_order.is_empty() {
        println!("\nContigs in reference order:");
        for name in &report.plot_order {
            println!("  {name}");
        }
    }
}
