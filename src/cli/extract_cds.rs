use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::parsing::fasta::{load_reference_with_sequences, write_sequences};
use crate::parsing::gff::parse_gff_file;
use crate::qc::cds::{extract_cds, CdsCatalog};
use crate::utils::validation::check_file_exists;

#[derive(Args)]
pub struct ExtractCdsArgs {
    /// Reference FASTA
    #[arg(long)]
    pub reference: PathBuf,

    /// GFF3 annotation of the reference
    #[arg(long)]
    pub gff: PathBuf,

    /// Output FASTA of CDS sequences, named `<seq>:<start>-<end>:<strand>`
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Serialize)]
struct ExtractSummary<'a> {
    output: &'a PathBuf,
    cds_written: usize,
    bases_written: usize,
}

/// Execute extract-cds subcommand
///
/// # Errors
///
/// Returns an error if an input is missing or malformed, or the output cannot
/// be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractCdsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    check_file_exists("reference", &args.reference)?;
    check_file_exists("annotation", &args.gff)?;

    let (layout, sequences) = load_reference_with_sequences(&args.reference)?;
    let annotation = parse_gff_file(&args.gff)?;
    let catalog = CdsCatalog::from_annotation(&layout, &annotation)?;

    let sequences: HashMap<String, Vec<u8>> = sequences.into_iter().collect();
    let records = extract_cds(&catalog, &sequences)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_sequences(&mut BufWriter::new(file), &records)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let summary = ExtractSummary {
        output: &args.output,
        cds_written: records.len(),
        bases_written: records.iter().map(|(_, seq)| seq.len()).sum(),
    };
    info!(
        "Wrote {} CDS to {}",
        summary.cds_written,
        args.output.display()
    );

    match format {
        OutputFormat::Text => {
            println!(
                "Wrote {} CDS ({} bases) to {}",
                summary.cds_written,
                summary.bases_written,
                args.output.display()
            );
            if verbose {
                for (name, seq) in &records {
                    println!("  {name}\t{}", seq.len());
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => {
            println!("output\tcds_written\tbases_written");
            println!(
                "{}\t{}\t{}",
                args.output.display(),
                summary.cds_written,
                summary.bases_written
            );
        }
    }

    Ok(())
}
