//! Core data types for assembly evaluation.
//!
//! - [`interval::Interval`], [`interval::IntervalSet`]: closed 0-based ranges
//!   and normalized sets of them, with merge, complement and intersection
//! - [`hit::AlignmentHit`]: one pairwise alignment reported by the aligner
//! - [`reference::ReferenceLayout`]: reference sequences in declaration order,
//!   with their offsets on one linear axis
//! - [`assembly::Assembly`]: the contigs under evaluation
//! - [`cds::CdsFeature`]: a coding sequence annotated on the reference
//! - [`types::Strand`], [`types::Stranded`]: strand and per-strand pairs
//!
//! ## Coordinates
//!
//! All positions are 0-based and intervals include both ends. Parsers convert
//! from the 1-based coordinates of coords, GFF and depth files; CDS ids are
//! the only place 1-based coordinates reappear.

pub mod assembly;
pub mod cds;
pub mod hit;
pub mod interval;
pub mod reference;
pub mod types;
