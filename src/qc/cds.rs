//! The set of reference CDS features scored by a run, and extraction of
//! their sequences for the external aligner.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::core::cds::CdsFeature;
use crate::core::reference::ReferenceLayout;
use crate::core::types::Strand;
use crate::parsing::gff::CdsBySequence;
use crate::qc::QcError;

/// Reference CDS features in reference declaration order, unique by id
#[derive(Debug, Clone, Default)]
pub struct CdsCatalog {
    features: Vec<CdsFeature>,
    ids: HashSet<String>,
}

impl CdsCatalog {
    /// Collect features from parsed annotation, walking sequences in the
    /// order of `layout`. Features on sequences outside the reference are
    /// dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `QcError::DuplicateCds` if two features share an id, or
    /// `QcError::OutOfBounds` if a feature extends past its sequence.
    pub fn from_annotation(layout: &ReferenceLayout, annotation: &CdsBySequence) -> Result<Self, QcError> {
        for name in annotation.keys() {
            if !layout.contains(name) {
                warn!("Annotation has CDS on '{name}', which is not in the reference; ignoring them");
            }
        }

        let ordered = layout
            .ids()
            .filter_map(|id| annotation.get(id))
            .flat_map(|features| features.iter().cloned());

        Self::from_features(layout, ordered)
    }

    /// Build a catalog from features already in the wanted order
    ///
    /// # Errors
    ///
    /// Returns `QcError::DuplicateCds` if two features share an id, or
    /// `QcError::OutOfBounds` if a feature extends past its sequence.
    pub fn from_features<I>(layout: &ReferenceLayout, features: I) -> Result<Self, QcError>
    where
        I: IntoIterator<Item = CdsFeature>,
    {
        let mut catalog = Self::default();

        for feature in features {
            let length = layout
                .length_of(&feature.parent_sequence)
                .ok_or_else(|| QcError::UnknownReference(feature.parent_sequence.clone()))?;
            if feature.ref_interval.end >= length {
                return Err(QcError::OutOfBounds {
                    sequence: feature.parent_sequence.clone(),
                    interval: feature.ref_interval,
                    length,
                });
            }

            let id = feature.id();
            if !catalog.ids.insert(id.clone()) {
                return Err(QcError::DuplicateCds(id));
            }
            catalog.features.push(feature);
        }

        debug!("Collected {} reference CDS", catalog.features.len());
        Ok(catalog)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CdsFeature> {
        self.features.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Reverse complement a nucleotide sequence, keeping case. Non-ACGT symbols
/// map to `N`.
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&base| match base {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' | b'U' => b'A',
            b'a' => b't',
            b'c' => b'g',
            b'g' => b'c',
            b't' | b'u' => b'a',
            b'n' => b'n',
            _ => b'N',
        })
        .collect()
}

/// The sequence of every CDS in the catalog, named by CDS id and given on the
/// coding strand
///
/// # Errors
///
/// Returns `QcError::UnknownReference` if a CDS parent has no sequence, or
/// `QcError::OutOfBounds` if the sequence is shorter than the CDS.
pub fn extract_cds(
    catalog: &CdsCatalog,
    sequences: &HashMap<String, Vec<u8>>,
) -> Result<Vec<(String, Vec<u8>)>, QcError> {
    catalog
        .iter()
        .map(|cds| {
            let parent = sequences
                .get(&cds.parent_sequence)
                .ok_or_else(|| QcError::UnknownReference(cds.parent_sequence.clone()))?;

            let out_of_bounds = || QcError::OutOfBounds {
                sequence: cds.parent_sequence.clone(),
                interval: cds.ref_interval,
                length: parent.len() as u64,
            };
            let start = usize::try_from(cds.ref_interval.start).map_err(|_| out_of_bounds())?;
            let end = usize::try_from(cds.ref_interval.end).map_err(|_| out_of_bounds())?;
            let slice = parent.get(start..=end).ok_or_else(out_of_bounds)?;

            let seq = match cds.strand {
                Strand::Forward => slice.to_vec(),
                Strand::Reverse => reverse_complement(slice),
            };
            Ok((cds.id(), seq))
        })
        .collect()
}
