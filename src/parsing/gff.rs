//! Parser for CDS features in GFF3 annotation.
//!
//! Only column 3 == `CDS` lines are kept. Annotation ends at a `##FASTA`
//! line, since GFF3 allows no features after embedded sequence.

use std::collections::HashMap;
use std::path::Path;

use crate::core::cds::CdsFeature;
use crate::core::interval::Interval;
use crate::core::types::Strand;
use crate::parsing::ParseError;

/// CDS features keyed by sequence name, each list sorted by (interval, strand)
pub type CdsBySequence = HashMap<String, Vec<CdsFeature>>;

/// Parse CDS features from a GFF3 file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a CDS line is malformed.
pub fn parse_gff_file(path: &Path) -> Result<CdsBySequence, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_gff_text(&content)
}

/// Parse CDS features from GFF3 text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a CDS line has too few columns, bad
/// coordinates or an unknown strand.
pub fn parse_gff_text(text: &str) -> Result<CdsBySequence, ParseError> {
    let mut features: CdsBySequence = HashMap::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line == "##FASTA" {
            break;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 7 {
            return Err(ParseError::InvalidFormat(format!(
                "GFF line {line_num} has {} columns, expected at least 7",
                fields.len()
            )));
        }

        if fields[2] != "CDS" {
            continue;
        }

        let start = parse_position(fields[3], line_num)?;
        let end = parse_position(fields[4], line_num)?;
        if start > end {
            return Err(ParseError::InvalidFormat(format!(
                "GFF line {line_num} has start {} after end {}",
                fields[3], fields[4]
            )));
        }

        let strand = Strand::parse(fields[6]).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "GFF line {line_num} has CDS strand '{}', expected + or -",
                fields[6]
            ))
        })?;

        features
            .entry(fields[0].to_string())
            .or_default()
            .push(CdsFeature::new(fields[0], Interval::new(start, end), strand));
    }

    for list in features.values_mut() {
        list.sort_by(|a, b| {
            (a.ref_interval, a.strand).cmp(&(b.ref_interval, b.strand))
        });
    }

    Ok(features)
}

/// Convert a 1-based GFF coordinate to 0-based
fn parse_position(field: &str, line_num: usize) -> Result<u64, ParseError> {
    let value: u64 = field.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid coordinate on GFF line {line_num}: '{field}'"
        ))
    })?;

    value.checked_sub(1).ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Coordinate 0 on GFF line {line_num}, GFF coordinates are 1-based"
        ))
    })
}
