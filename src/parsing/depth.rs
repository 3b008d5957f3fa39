//! Parser for precomputed per-strand depth tables.
//!
//! Columns: `name`, 1-based `pos`, forward depth, reverse depth. An optional
//! header line whose first column is `name`, `chrom` or `#...` is skipped.
//! Positions that are not listed have depth 0.

use std::path::Path;

use crate::core::reference::ReferenceLayout;
use crate::core::types::Stranded;
use crate::parsing::bam::StrandDepths;
use crate::parsing::ParseError;

/// Parse a depth table for the sequences of `layout`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_depth_file(path: &Path, layout: &ReferenceLayout) -> Result<StrandDepths, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_depth_text(&content, layout)
}

/// Parse depth table text for the sequences of `layout`
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 4 fields, holds
/// a non-numeric value, names an unknown sequence, or a position lies outside
/// its sequence.
pub fn parse_depth_text(text: &str, layout: &ReferenceLayout) -> Result<StrandDepths, ParseError> {
    let mut depths: StrandDepths = layout
        .iter()
        .map(|seq| {
            let length = usize::try_from(seq.length).unwrap_or(usize::MAX);
            (
                seq.id.clone(),
                Stranded::new(vec![0u32; length], vec![0u32; length]),
            )
        })
        .collect();

    let mut first_data_line = true;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "name" || first == "chrom" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 4 {
            return Err(ParseError::InvalidFormat(format!(
                "Depth line {line_num} has fewer than 4 fields"
            )));
        }

        let name = fields[0].trim();
        let number = |idx: usize| -> Result<u64, ParseError> {
            fields[idx].trim().parse().map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "Invalid number on depth line {line_num}: '{}'",
                    fields[idx]
                ))
            })
        };
        let pos = number(1)?;
        let forward = u32::try_from(number(2)?).unwrap_or(u32::MAX);
        let reverse = u32::try_from(number(3)?).unwrap_or(u32::MAX);

        let per_strand = depths.get_mut(name).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Depth line {line_num} names '{name}', which is not in the reference"
            ))
        })?;

        let index = pos
            .checked_sub(1)
            .and_then(|p| usize::try_from(p).ok())
            .filter(|&p| p < per_strand.forward.len())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Depth line {line_num} has position {pos} outside '{name}'"
                ))
            })?;

        per_strand.forward[index] = forward;
        per_strand.reverse[index] = reverse;
    }

    Ok(depths)
}
