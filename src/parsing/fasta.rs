//! FASTA reading and writing using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed input. Sequence
//! names are the first word of the definition line.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use tracing::debug;

use crate::core::assembly::{Assembly, AssemblyContig};
use crate::core::reference::ReferenceLayout;
use crate::parsing::fai::{fai_path_for, parse_fai_file};
use crate::parsing::ParseError;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file as `(name, sequence)` pairs, in file order
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or `ParseError::Noodles`
/// if a record is malformed.
pub fn read_sequences(path: &Path) -> Result<Vec<(String, Vec<u8>)>, ParseError> {
    let file = std::fs::File::open(path)?;

    if is_gzipped(path) {
        let reader = BufReader::new(GzDecoder::new(file));
        read_sequences_from(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        read_sequences_from(&mut fasta::io::Reader::new(reader))
    }
}

fn read_sequences_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<(String, Vec<u8>)>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence = record.sequence().as_ref().to_vec();
        records.push((name, sequence));
    }

    Ok(records)
}

/// Read an assembly FASTA. A zero-byte file or a file without records is the
/// empty assembly.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles`
/// if a record is malformed, or `ParseError::InvalidFormat` if a contig name
/// is repeated.
pub fn read_assembly(path: &Path) -> Result<Assembly, ParseError> {
    if std::fs::metadata(path)?.len() == 0 {
        return Ok(Assembly::empty());
    }

    assembly_from_records(read_sequences(path)?)
}

fn assembly_from_records(records: Vec<(String, Vec<u8>)>) -> Result<Assembly, ParseError> {
    let mut seen = HashSet::new();
    let mut contigs = Vec::with_capacity(records.len());
    for (name, sequence) in records {
        if !seen.insert(name.clone()) {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate contig name in assembly: {name}"
            )));
        }
        contigs.push(AssemblyContig::new(name, sequence));
    }

    Ok(Assembly::new(contigs))
}

/// MD5 of the uppercase sequence (standard convention for sequence checksums)
#[must_use]
pub fn sequence_md5(sequence: &[u8]) -> String {
    let uppercase: Vec<u8> = sequence.iter().map(u8::to_ascii_uppercase).collect();
    format!("{:x}", md5::compute(&uppercase))
}

/// Load the reference layout for a FASTA file.
///
/// Names, order and lengths come from the `.fai` next to the FASTA when one
/// exists, otherwise from the records themselves. MD5 checksums are always
/// computed from the sequences.
///
/// # Errors
///
/// Returns `ParseError` if the FASTA or its index cannot be read, or if a
/// sequence name is repeated.
pub fn load_reference(path: &Path) -> Result<ReferenceLayout, ParseError> {
    load_reference_with_sequences(path).map(|(layout, _)| layout)
}

/// Load the reference layout together with the sequences it was built from,
/// reading the FASTA once
///
/// # Errors
///
/// Returns `ParseError` if the FASTA or its index cannot be read, or if a
/// sequence name is repeated.
pub fn load_reference_with_sequences(
    path: &Path,
) -> Result<(ReferenceLayout, Vec<(String, Vec<u8>)>), ParseError> {
    let records = read_sequences(path)?;
    let md5s: HashMap<String, String> = records
        .iter()
        .map(|(name, sequence)| (name.clone(), sequence_md5(sequence)))
        .collect();

    let fai = fai_path_for(path);
    let layout = if fai.exists() {
        debug!("Reading reference lengths from {}", fai.display());
        parse_fai_file(&fai)?
    } else {
        debug!("No index at {}, using FASTA record lengths", fai.display());
        ReferenceLayout::from_lengths(
            records
                .iter()
                .map(|(name, sequence)| (name.clone(), sequence.len() as u64)),
        )?
    };

    Ok((layout.with_md5s(&md5s), records))
}

/// Write `(name, sequence)` records as FASTA and flush `writer`
///
/// # Errors
///
/// Returns `ParseError::Io` if writing or flushing fails.
pub fn write_sequences<W: Write>(
    writer: &mut W,
    records: &[(String, Vec<u8>)],
) -> Result<(), ParseError> {
    let mut fasta_writer = fasta::io::Writer::new(&mut *writer);

    for (name, sequence) in records {
        let record = fasta::Record::new(
            fasta::record::Definition::new(name.as_str(), None),
            fasta::record::Sequence::from(sequence.clone()),
        );
        fasta_writer.write_record(&record)?;
    }

    drop(fasta_writer);
    writer.flush()?;
    Ok(())
}
