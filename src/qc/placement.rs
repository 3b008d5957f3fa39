//! Where each contig lands on the reference.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::core::hit::AlignmentHit;
use crate::core::interval::Interval;
use crate::core::reference::ReferenceLayout;
use crate::qc::classify::classify_hits;
use crate::qc::hits::ContigHits;

/// One hit of a contig, reduced to its placement on the reference.
///
/// Field order defines the sort order: query interval first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Placement {
    pub query_interval: Interval,
    pub ref_name: String,
    pub ref_interval: Interval,
    pub same_strand: bool,
    pub repetitive: bool,
}

impl Placement {
    fn from_hit(hit: &AlignmentHit, repetitive: bool) -> Self {
        Self {
            query_interval: hit.query_interval(),
            ref_name: hit.ref_name.clone(),
            ref_interval: hit.ref_interval(),
            same_strand: hit.same_strand(),
            repetitive,
        }
    }
}

/// Sorted placements of one contig's hits
#[must_use]
pub fn place_contig(hits: &[AlignmentHit]) -> Vec<Placement> {
    let classified = classify_hits(hits);

    let mut placements: Vec<Placement> = classified
        .unique
        .iter()
        .map(|hit| Placement::from_hit(hit, false))
        .chain(
            classified
                .repetitive
                .iter()
                .map(|hit| Placement::from_hit(hit, true)),
        )
        .collect();

    placements.sort();
    placements
}

#[derive(Debug, Clone, Serialize)]
pub struct ContigPlacement {
    pub contig: String,
    pub placements: Vec<Placement>,
}

/// Placements of every contig that hit the reference, in hit-file order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ContigPlacements(Vec<ContigPlacement>);

impl ContigPlacements {
    #[must_use]
    pub fn compute(hits: &ContigHits) -> Self {
        let placements: Vec<ContigPlacement> = hits
            .iter()
            .map(|(contig, contig_hits)| ContigPlacement {
                contig: contig.to_string(),
                placements: place_contig(contig_hits),
            })
            .collect();

        let repetitive = placements
            .iter()
            .filter(|c| c.placements.iter().any(|p| p.repetitive))
            .count();
        debug!(
            "Placed {} contigs on the reference, {repetitive} with repetitive hits",
            placements.len()
        );

        Self(placements)
    }

    #[must_use]
    pub fn get(&self, contig: &str) -> Option<&[Placement]> {
        self.0
            .iter()
            .find(|c| c.contig == contig)
            .map(|c| c.placements.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContigPlacement> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Contig names ordered by where their placements fall on the reference
    /// laid out end to end. Each name appears once, at its leftmost placement.
    #[must_use]
    pub fn plot_order(&self, layout: &ReferenceLayout) -> Vec<String> {
        let mut positions: Vec<(Interval, Interval, bool, bool, &str)> = self
            .0
            .iter()
            .flat_map(|contig| {
                contig.placements.iter().map(move |p| {
                    let offset = layout.offset_of(&p.ref_name).unwrap_or(0);
                    (
                        p.ref_interval.offset_by(offset),
                        p.query_interval,
                        p.same_strand,
                        p.repetitive,
                        contig.contig.as_str(),
                    )
                })
            })
            .collect();
        positions.sort();

        let mut seen = HashSet::new();
        positions
            .into_iter()
            .filter(|(.., name)| seen.insert(*name))
            .map(|(.., name)| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembly::{Assembly, AssemblyContig};
    use crate::parsing::coords::HitsByQuery;

    #[test]
    fn test_place_contig_sorts_by_query_interval() {
        let hits = vec![
            AlignmentHit::new("ctg1", (500, 599), "ref1", (0, 99)),
            AlignmentHit::new("ctg1", (0, 199), "ref1", (1000, 1199)),
            AlignmentHit::new("ctg1", (150, 250), "ref2", (250, 150)),
        ];
        let placements = place_contig(&hits);

        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].query_interval, Interval::new(0, 199));
        assert!(placements[0].repetitive);
        assert_eq!(placements[1].query_interval, Interval::new(150, 250));
        assert!(placements[1].repetitive);
        assert!(!placements[1].same_strand);
        assert_eq!(placements[2].query_interval, Interval::new(500, 599));
        assert!(!placements[2].repetitive);
    }

    #[test]
    fn test_plot_order_uses_linear_layout() {
        let layout = ReferenceLayout::from_lengths(vec![("ref1", 1000), ("ref2", 1000)]).unwrap();
        let hits: HitsByQuery = vec![
            AlignmentHit::new("ctg_a", (0, 99), "ref2", (0, 99)),
            AlignmentHit::new("ctg_b", (0, 99), "ref1", (900, 999)),
            AlignmentHit::new("ctg_c", (0, 99), "ref1", (100, 199)),
            AlignmentHit::new("ctg_c", (200, 299), "ref2", (500, 599)),
        ]
        .into_iter()
        .collect();
        let assembly = Assembly::new(vec![
            AssemblyContig::new("ctg_a", vec![b'A'; 100]),
            AssemblyContig::new("ctg_b", vec![b'A'; 100]),
            AssemblyContig::new("ctg_c", vec![b'A'; 300]),
        ]);
        let hits = ContigHits::validate(hits, &assembly, &layout).unwrap();

        let placements = ContigPlacements::compute(&hits);
        assert_eq!(placements.len(), 3);
        assert_eq!(placements.get("ctg_c").map(<[Placement]>::len), Some(2));
        assert_eq!(placements.plot_order(&layout), vec!["ctg_c", "ctg_b", "ctg_a"]);
    }

    #[test]
    fn test_no_hits_no_placements() {
        let layout = ReferenceLayout::from_lengths(vec![("ref1", 1000)]).unwrap();
        let placements = ContigPlacements::compute(&ContigHits::none());
        assert!(placements.is_empty());
        assert!(placements.plot_order(&layout).is_empty());
    }
}
