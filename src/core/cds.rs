use serde::{Deserialize, Serialize};

use crate::core::interval::Interval;
use crate::core::types::Strand;

/// A coding sequence feature on a reference sequence
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CdsFeature {
    /// Reference sequence the feature lies on
    pub parent_sequence: String,

    /// 0-based inclusive span on the parent
    pub ref_interval: Interval,

    pub strand: Strand,
}

impl CdsFeature {
    pub fn new(parent_sequence: impl Into<String>, ref_interval: Interval, strand: Strand) -> Self {
        Self {
            parent_sequence: parent_sequence.into(),
            ref_interval,
            strand,
        }
    }

    /// Identifier of the form `<parent>:<start>-<end>:<strand>` using 1-based
    /// coordinates. This is also the FASTA name of the extracted CDS sequence,
    /// so CDS-vs-assembly hits refer back to the feature by it.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}:{}-{}:{}",
            self.parent_sequence,
            self.ref_interval.start + 1,
            self.ref_interval.end + 1,
            self.strand
        )
    }

    #[must_use]
    pub fn length_in_reference(&self) -> u64 {
        self.ref_interval.len()
    }
}
