//! Read depth and base support from coordinate-sorted BAM files using noodles.
//!
//! Records that are unmapped, secondary, QC-failed or duplicates are skipped,
//! matching the default pileup filters. Only aligned bases (CIGAR `M`, `=` and
//! `X`) count; deletions and reference skips add no depth.

use std::collections::HashMap;
use std::path::Path;

use noodles::bam;
use noodles::sam::alignment::record::cigar::op::Kind;
use tracing::{debug, warn};

use crate::core::assembly::Assembly;
use crate::core::reference::ReferenceLayout;
use crate::core::types::{Strand, Stranded};
use crate::parsing::ParseError;

/// Per-strand read depth for every reference sequence
pub type StrandDepths = HashMap<String, Stranded<Vec<u32>>>;

/// Read support for each base (A, C, G, T) at every contig position
pub type BaseCounts = HashMap<String, Vec<[u32; 4]>>;

/// An aligned block: `len` bases starting at `ref_pos` on the reference and
/// `read_pos` on the read, both 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AlignedBlock {
    ref_pos: usize,
    read_pos: usize,
    len: usize,
}

/// A mapped record reduced to what depth and base counting need
struct MappedRead {
    reference_id: usize,
    strand: Strand,
    blocks: Vec<AlignedBlock>,
    bases: Vec<u8>,
}

/// Walk a BAM file, handing each counted record to `visit` along with the
/// name of its reference sequence. Returns the `(name, length)` pairs declared
/// in the header.
fn for_each_mapped_read<F>(
    path: &Path,
    with_bases: bool,
    mut visit: F,
) -> Result<Vec<(String, usize)>, ParseError>
where
    F: FnMut(&str, &MappedRead),
{
    let mut reader = std::fs::File::open(path).map(bam::io::Reader::new)?;

    let header = reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))?;

    let declared: Vec<(String, usize)> = header
        .reference_sequences()
        .iter()
        .map(|(name, map)| (name.to_string(), map.length().get()))
        .collect();

    let mut counted = 0usize;
    for result in reader.records() {
        let record = result?;

        let flags = record.flags();
        if flags.is_unmapped() || flags.is_secondary() || flags.is_qc_fail() || flags.is_duplicate()
        {
            continue;
        }

        let Some(reference_id) = record.reference_sequence_id().transpose()? else {
            continue;
        };
        let Some(start) = record.alignment_start().transpose()? else {
            continue;
        };

        let (name, _) = declared.get(reference_id).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Record refers to reference sequence {reference_id}, but the header declares {}",
                declared.len()
            ))
        })?;

        let mut blocks = Vec::new();
        let mut ref_pos = usize::from(start) - 1;
        let mut read_pos = 0usize;
        for op in record.cigar().iter() {
            let op = op?;
            let len = op.len();
            match op.kind() {
                Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                    blocks.push(AlignedBlock {
                        ref_pos,
                        read_pos,
                        len,
                    });
                    ref_pos += len;
                    read_pos += len;
                }
                Kind::Insertion | Kind::SoftClip => read_pos += len,
                Kind::Deletion | Kind::Skip => ref_pos += len,
                Kind::HardClip | Kind::Pad => {}
            }
        }

        let bases = if with_bases {
            record.sequence().iter().collect()
        } else {
            Vec::new()
        };

        let strand = if flags.is_reverse_complemented() {
            Strand::Reverse
        } else {
            Strand::Forward
        };

        visit(
            name,
            &MappedRead {
                reference_id,
                strand,
                blocks,
                bases,
            },
        );
        counted += 1;
    }

    debug!("Counted {counted} mapped reads from {}", path.display());
    Ok(declared)
}

/// Per-strand depth arrays for every sequence in `layout`, from reads mapped
/// to the reference. Sequences with no reads get all-zero arrays.
///
/// # Errors
///
/// Returns `ParseError` if the BAM cannot be read or is malformed.
pub fn read_strand_depths(path: &Path, layout: &ReferenceLayout) -> Result<StrandDepths, ParseError> {
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

    let mut unknown: HashMap<usize, String> = HashMap::new();
    let declared = for_each_mapped_read(path, false, |name, read| {
        let Some(per_strand) = depths.get_mut(name) else {
            unknown
                .entry(read.reference_id)
                .or_insert_with(|| name.to_string());
            return;
        };

        let depth = per_strand.get_mut(read.strand);
        for block in &read.blocks {
            add_block_depth(depth, block);
        }
    })?;

    for name in unknown.values() {
        warn!("Reads map to '{name}', which is not in the reference; ignoring them");
    }
    for (name, length) in &declared {
        if let Some(expected) = layout.length_of(name) {
            if *length as u64 != expected {
                warn!(
                    "BAM header gives '{name}' length {length}, reference index gives {expected}"
                );
            }
        }
    }

    Ok(depths)
}

fn add_block_depth(depth: &mut [u32], block: &AlignedBlock) {
    let start = block.ref_pos.min(depth.len());
    let end = (block.ref_pos + block.len).min(depth.len());
    for d in &mut depth[start..end] {
        *d = d.saturating_add(1);
    }
}

/// Per-position base counts for every contig of `assembly`, from reads mapped
/// to the assembly
///
/// # Errors
///
/// Returns `ParseError` if the BAM cannot be read or is malformed.
pub fn read_base_counts(path: &Path, assembly: &Assembly) -> Result<BaseCounts, ParseError> {
    let mut counts: BaseCounts = assembly
        .iter()
        .map(|contig| (contig.name.clone(), vec![[0u32; 4]; contig.sequence.len()]))
        .collect();

    for_each_mapped_read(path, true, |name, read| {
        let Some(contig_counts) = counts.get_mut(name) else {
            return;
        };

        for block in &read.blocks {
            for i in 0..block.len {
                let Some(slot) = contig_counts.get_mut(block.ref_pos + i) else {
                    break;
                };
                if let Some(base) = read.bases.get(block.read_pos + i).copied().and_then(base_index) {
                    slot[base] = slot[base].saturating_add(1);
                }
            }
        }
    })?;

    Ok(counts)
}

/// Index of a nucleotide in a `[A, C, G, T]` count array
#[must_use]
pub fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}
