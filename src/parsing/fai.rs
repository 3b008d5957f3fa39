//! Parser for FASTA index (.fai) files using noodles.
//!
//! FAI format provides name and length for each sequence, in FASTA order.
//! Format: `name\tlength\toffset\tline_bases\tline_width`

use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::core::reference::ReferenceLayout;
use crate::parsing::ParseError;

/// Path of the index that sits next to a FASTA file (`ref.fa` -> `ref.fa.fai`)
#[must_use]
pub fn fai_path_for(fasta: &Path) -> PathBuf {
    let mut path = fasta.as_os_str().to_owned();
    path.push(".fai");
    PathBuf::from(path)
}

/// Parse a FASTA index (.fai) file using noodles
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, or `ParseError::InvalidFormat` if a name is repeated.
pub fn parse_fai_file(path: &Path) -> Result<ReferenceLayout, ParseError> {
    use noodles::fasta;

    let reader = std::fs::File::open(path).map(BufReader::new)?;

    let index = fasta::fai::io::Reader::new(reader)
        .read_index()
        .map_err(|e| ParseError::Noodles(format!("Failed to parse FAI file: {e}")))?;

    ReferenceLayout::from_lengths(index.as_ref().iter().map(|record| {
        (
            String::from_utf8_lossy(record.name()).to_string(),
            record.length(),
        )
    }))
}
