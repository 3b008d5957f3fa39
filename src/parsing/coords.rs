//! Parser for nucmer `show-coords -dTlro` output.
//!
//! The file starts with a short header (the two input paths, `NUCMER`, a blank
//! line and a bracketed column header). Each following line is one alignment:
//!
//! ```text
//! [S1] [E1] [S2] [E2] [LEN 1] [LEN 2] [% IDY] [LEN R] [LEN Q] [FRM] [TAGS]
//! ```
//!
//! `-d` adds a second frame column, so records carry 13 fields with the
//! reference and query names in the last two. Side 1 is the reference,
//! side 2 the query; coordinates are 1-based and converted to 0-based here.

use std::collections::HashMap;
use std::path::Path;

use crate::core::hit::AlignmentHit;
use crate::parsing::ParseError;

/// Alignment hits grouped by query sequence, in file order
#[derive(Debug, Clone, Default)]
pub struct HitsByQuery {
    order: Vec<String>,
    hits: HashMap<String, Vec<AlignmentHit>>,
}

impl HitsByQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hit: AlignmentHit) {
        if let Some(list) = self.hits.get_mut(&hit.query_name) {
            list.push(hit);
        } else {
            self.order.push(hit.query_name.clone());
            self.hits.insert(hit.query_name.clone(), vec![hit]);
        }
    }

    /// Hits of one query, in file order
    #[must_use]
    pub fn get(&self, query_name: &str) -> Option<&[AlignmentHit]> {
        self.hits.get(query_name).map(Vec::as_slice)
    }

    /// `(query_name, hits)` pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AlignmentHit])> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.hits[name].as_slice()))
    }

    /// All hits regrouped by reference name, preserving query-then-file order
    #[must_use]
    pub fn by_reference(&self) -> HashMap<&str, Vec<&AlignmentHit>> {
        let mut by_ref: HashMap<&str, Vec<&AlignmentHit>> = HashMap::new();
        for (_, hits) in self.iter() {
            for hit in hits {
                by_ref.entry(hit.ref_name.as_str()).or_default().push(hit);
            }
        }
        by_ref
    }

    /// Number of distinct query sequences
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of hits
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }
}

impl FromIterator<AlignmentHit> for HitsByQuery {
    fn from_iter<T: IntoIterator<Item = AlignmentHit>>(iter: T) -> Self {
        let mut grouped = Self::new();
        for hit in iter {
            grouped.push(hit);
        }
        grouped
    }
}

/// Parse a coordinates file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a record line is malformed.
pub fn parse_coords_file(path: &Path) -> Result<HitsByQuery, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_coords_text(&content)
}

/// Parse coordinates from text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a record line is malformed.
pub fn parse_coords_text(text: &str) -> Result<HitsByQuery, ParseError> {
    let mut hits = HitsByQuery::new();

    // Records follow the `[S1]` column header. Without one, every line that
    // starts with a digit is a record.
    let first_record = text
        .lines()
        .position(|line| line.trim_start().starts_with("[S1]"))
        .map(|header| header + 1);

    for (i, line) in text.lines().enumerate() {
        let is_record = match first_record {
            Some(first) => i >= first && !line.trim().is_empty(),
            None => line.starts_with(|c: char| c.is_ascii_digit()),
        };
        if is_record {
            hits.push(parse_record(line.trim_end(), i + 1)?);
        }
    }

    Ok(hits)
}

fn parse_record(line: &str, line_num: usize) -> Result<AlignmentHit, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();

    // 9 numeric columns, then optional frames, then the two names
    if fields.len() < 11 {
        return Err(ParseError::InvalidFormat(format!(
            "Coordinates line {line_num} has {} fields, expected at least 11",
            fields.len()
        )));
    }

    let coord = |idx: usize, label: &str| -> Result<u64, ParseError> {
        let value: u64 = fields[idx].trim().parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid {label} on coordinates line {line_num}: '{}'",
                fields[idx]
            ))
        })?;
        value.checked_sub(1).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "{label} on coordinates line {line_num} is 0, coordinates are 1-based"
            ))
        })
    };
    let length = |idx: usize, label: &str| -> Result<u64, ParseError> {
        fields[idx].trim().parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid {label} on coordinates line {line_num}: '{}'",
                fields[idx]
            ))
        })
    };

    let ref_start = coord(0, "reference start")?;
    let ref_end = coord(1, "reference end")?;
    let query_start = coord(2, "query start")?;
    let query_end = coord(3, "query end")?;
    let percent_identity: f64 = fields[6].trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid percent identity on coordinates line {line_num}: '{}'",
            fields[6]
        ))
    })?;
    let ref_length = length(7, "reference length")?;
    let query_length = length(8, "query length")?;

    let (ref_name, query_name) = if fields.len() >= 13 {
        (fields[11], fields[12])
    } else {
        (fields[fields.len() - 2], fields[fields.len() - 1])
    };

    if ref_name.is_empty() || query_name.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "Empty sequence name on coordinates line {line_num}"
        )));
    }

    let mut hit = AlignmentHit::new(
        query_name,
        (query_start, query_end),
        ref_name,
        (ref_start, ref_end),
    )
    .with_identity(percent_identity);
    hit.ref_length = Some(ref_length);
    hit.query_length = Some(query_length);

    Ok(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::Interval;

    const COORDS: &str = "/data/ref.fa /data/assembly.fa
NUCMER

[S1]\t[E1]\t[S2]\t[E2]\t[LEN 1]\t[LEN 2]\t[% IDY]\t[LEN R]\t[LEN Q]\t[FRM]\t[TAGS]
1\t1000\t1\t1000\t1000\t1000\t99.80\t5000\t1200\t1\t1\tref1\tcontig1
2001\t2100\t1100\t1001\t100\t100\t98.00\t5000\t1200\t1\t-1\tref1\tcontig1
1\t500\t1\t500\t500\t500\t100.00\t800\t500\t1\t1\tref2\tcontig2
";

    #[test]
    fn test_parse_coords_text() {
        let hits = parse_coords_text(COORDS).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.hit_count(), 3);

        let contig1 = hits.get("contig1").unwrap();
        assert_eq!(contig1.len(), 2);
        assert_eq!(contig1[0].ref_name, "ref1");
        assert_eq!(contig1[0].ref_interval(), Interval::new(0, 999));
        assert_eq!(contig1[0].ref_length, Some(5000));
        assert_eq!(contig1[0].query_length, Some(1200));
        assert!(contig1[0].same_strand());

        // Reverse-strand hit keeps its reported direction
        assert_eq!(contig1[1].query_start, 1099);
        assert_eq!(contig1[1].query_end, 1000);
        assert!(!contig1[1].same_strand());
        assert!((contig1[1].percent_identity - 98.0).abs() < f64::EPSILON);

        let order: Vec<&str> = hits.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["contig1", "contig2"]);
    }

    #[test]
    fn test_by_reference() {
        let hits = parse_coords_text(COORDS).unwrap();
        let by_ref = hits.by_reference();
        assert_eq!(by_ref["ref1"].len(), 2);
        assert_eq!(by_ref["ref2"].len(), 1);
    }

    #[test]
    fn test_parse_without_frame_columns() {
        let text = "1\t100\t100\t1\t100\t100\t97.5\t1000\t100\tchr1\tctg9\n";
        let hits = parse_coords_text(text).unwrap();
        let hit = &hits.get("ctg9").unwrap()[0];
        assert_eq!(hit.ref_name, "chr1");
        assert!(!hit.same_strand());
    }

    #[test]
    fn test_header_only_is_empty() {
        let text = "/a.fa /b.fa\nNUCMER\n\n[S1]\t[E1]\n";
        let hits = parse_coords_text(text).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_header_paths_starting_with_digits() {
        let text = "2024_ref.fa 2024_contigs.fa\nNUCMER\n\n[S1]\t[E1]\t[S2]\t[E2]\t[LEN 1]\t[LEN 2]\t[% IDY]\t[LEN R]\t[LEN Q]\t[FRM]\t[TAGS]\n1\t500\t1\t500\t500\t500\t100.00\t800\t500\t1\t1\tref2\tcontig2\n";
        let hits = parse_coords_text(text).unwrap();
        assert_eq!(hits.hit_count(), 1);
        assert_eq!(hits.get("contig2").unwrap()[0].ref_name, "ref2");
    }

    #[test]
    fn test_malformed_record() {
        let text = "1\t100\tabc\t1\t100\t100\t97.5\t1000\t100\tchr1\tctg9\n";
        assert!(matches!(
            parse_coords_text(text),
            Err(ParseError::InvalidFormat(_))
        ));

        let too_short = "1\t100\t1\t100\n";
        assert!(parse_coords_text(too_short).is_err());
    }
}
