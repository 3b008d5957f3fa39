use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::parsing::ParseError;

/// One reference sequence and its position in the linear layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSequence {
    /// Sequence name from the FASTA index
    pub id: String,

    /// Sequence length
    pub length: u64,

    /// Sum of the lengths of all sequences declared before this one.
    /// Only used to project coordinates onto one linear axis.
    pub offset: u64,

    /// MD5 of the uppercase sequence, when the sequence itself was read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

/// The reference sequences of a run, in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceLayout {
    pub sequences: Vec<ReferenceSequence>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ReferenceLayout {
    /// Build a layout from `(name, length)` pairs in declaration order
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if a name appears twice.
    pub fn from_lengths<I, S>(lengths: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut layout = Self::default();
        let mut offset = 0u64;

        for (name, length) in lengths {
            let id: String = name.into();
            if layout.index.contains_key(&id) {
                return Err(ParseError::InvalidFormat(format!(
                    "Reference sequence '{id}' is declared more than once"
                )));
            }

            layout.index.insert(id.clone(), layout.sequences.len());
            layout.sequences.push(ReferenceSequence {
                id,
                length,
                offset,
                md5: None,
            });
            offset += length;
        }

        Ok(layout)
    }

    /// Attach MD5 checksums keyed by sequence id. Unknown ids are ignored.
    #[must_use]
    pub fn with_md5s(mut self, md5s: &HashMap<String, String>) -> Self {
        for seq in &mut self.sequences {
            if let Some(md5) = md5s.get(&seq.id) {
                seq.md5 = Some(md5.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ReferenceSequence> {
        self.index.get(id).map(|&i| &self.sequences[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn length_of(&self, id: &str) -> Option<u64> {
        self.get(id).map(|s| s.length)
    }

    #[must_use]
    pub fn offset_of(&self, id: &str) -> Option<u64> {
        self.get(id).map(|s| s.offset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceSequence> {
        self.sequences.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|s| s.id.as_str())
    }

    /// Total length of all reference sequences
    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.sequences.iter().map(|s| s.length).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
