//! Six-frame open reading frame scan using the standard genetic code.
//!
//! Within a frame, each stretch of complete codons that ends at a stop codon
//! (stop included), or at the end of the sequence, is an ORF. Ambiguous codons
//! do not break an ORF, but ambiguous codons at the very end of a frame are
//! dropped before the scan.

use crate::core::interval::Interval;
use crate::core::types::Strand;
use crate::qc::cds::reverse_complement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codon {
    Sense,
    Stop,
    Ambiguous,
}

fn classify_codon(codon: &[u8]) -> Codon {
    let upper = [
        codon[0].to_ascii_uppercase(),
        codon[1].to_ascii_uppercase(),
        codon[2].to_ascii_uppercase(),
    ];
    if upper.iter().any(|b| !matches!(b, b'A' | b'C' | b'G' | b'T')) {
        return Codon::Ambiguous;
    }
    match &upper {
        b"TAA" | b"TAG" | b"TGA" => Codon::Stop,
        _ => Codon::Sense,
    }
}

/// An ORF found on `strand`, with `interval` in forward-strand coordinates of
/// the scanned sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Orf {
    pub interval: Interval,
    pub strand: Strand,
}

/// ORFs of one frame, as codon index ranges
fn frame_orfs(seq: &[u8], frame: usize) -> Vec<(usize, usize)> {
    let mut codons: Vec<Codon> = seq
        .get(frame..)
        .unwrap_or_default()
        .chunks_exact(3)
        .map(classify_codon)
        .collect();
    while codons.last() == Some(&Codon::Ambiguous) {
        codons.pop();
    }

    let mut orfs = Vec::new();
    let mut start = 0;
    for (i, codon) in codons.iter().enumerate() {
        if *codon == Codon::Stop {
            if i > start {
                orfs.push((start, i));
            }
            start = i + 1;
        }
    }
    if start < codons.len() {
        orfs.push((start, codons.len() - 1));
    }

    orfs
}

/// Every ORF of `seq` at least `min_length` nucleotides long, sorted by
/// position
#[must_use]
pub fn find_orfs(seq: &[u8], min_length: f64) -> Vec<Orf> {
    let len = seq.len();
    let revcomp = reverse_complement(seq);
    let mut found = Vec::new();

    for frame in 0..3 {
        for (first, last) in frame_orfs(seq, frame) {
            found.push(Orf {
                interval: Interval::new((first * 3 + frame) as u64, (last * 3 + 2 + frame) as u64),
                strand: Strand::Forward,
            });
        }
        for (first, last) in frame_orfs(&revcomp, frame) {
            found.push(Orf {
                interval: Interval::new(
                    (len - (last * 3 + 3) - frame) as u64,
                    (len - first * 3 - 1 - frame) as u64,
                ),
                strand: Strand::Reverse,
            });
        }
    }

    found.retain(|orf| orf.interval.len() as f64 >= min_length);
    found.sort();
    found
}

/// True if `seq` holds an ORF at least `min_length` nucleotides long on
/// either strand
#[must_use]
pub fn has_orf(seq: &[u8], min_length: f64) -> bool {
    !find_orfs(seq, min_length).is_empty()
}
