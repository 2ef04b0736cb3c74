//! Joining wide vote tables onto region geometries.

use crate::models::VoteMatrix;
use geo::MultiPolygon;

use super::regions::Region;

/// One region with its per-candidate vote counts, in candidate column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionVotes {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub votes: Vec<f64>,
}

/// Result of the left join of a [`VoteMatrix`] onto a region list.
///
/// Geometry is authoritative: every input region appears exactly once, in
/// input order, with all-zero votes when the table has no row for it. Vote
/// rows whose region has no geometry end up in `dropped`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedVotes {
    pub candidates: Vec<String>,
    pub regions: Vec<RegionVotes>,
    pub dropped: Vec<String>,
}

impl MergedVotes {
    /// Global (min, max) across every candidate cell of the merged table,
    /// zero-filled cells included.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for region in &self.regions {
            for &v in &region.votes {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        bounds
    }

    /// The merged table without geometry, for further composition.
    pub fn to_matrix(&self) -> VoteMatrix {
        let mut matrix = VoteMatrix::new(self.candidates.clone());
        for region in &self.regions {
            matrix.ensure_region(&region.name);
            for (candidate, votes) in self.candidates.iter().zip(&region.votes) {
                matrix.add_votes(&region.name, candidate, *votes);
            }
        }
        matrix
    }
}

/// Left-join `matrix` onto `regions` by region name.
///
/// Unmatched regions get zero votes for every candidate. Vote rows with no
/// matching geometry are dropped (and reported), since geometry decides
/// which regions appear on the map.
pub fn merge_votes(regions: Vec<Region>, matrix: &VoteMatrix) -> MergedVotes {
    let width = matrix.candidates().len();
    let mut merged = Vec::with_capacity(regions.len());
    for region in regions {
        let votes = matrix
            .row(&region.name)
            .map(|r| r.to_vec())
            .unwrap_or_else(|| vec![0.0; width]);
        merged.push(RegionVotes {
            name: region.name,
            geometry: region.geometry,
            votes,
        });
    }

    let geometry_names: std::collections::BTreeSet<&str> =
        merged.iter().map(|r| r.name.as_str()).collect();
    let dropped: Vec<String> = matrix
        .regions()
        .filter(|r| !geometry_names.contains(r))
        .map(String::from)
        .collect();
    if !dropped.is_empty() {
        log::warn!(
            "{} vote table region(s) have no matching geometry and were dropped (e.g. '{}')",
            dropped.len(),
            dropped[0]
        );
    }

    MergedVotes {
        candidates: matrix.candidates().to_vec(),
        regions: merged,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn region(name: &str) -> Region {
        Region::new(
            name,
            MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
        )
    }

    fn matrix() -> VoteMatrix {
        let mut m = VoteMatrix::new(vec!["cand1".into(), "cand2".into()]);
        m.add_votes("A", "cand1", 10.0);
        m.add_votes("A", "cand2", 5.0);
        m.add_votes("Ghost", "cand1", 99.0);
        m
    }

    #[test]
    fn geometry_only_regions_get_zeros() {
        let merged = merge_votes(vec![region("A"), region("B")], &matrix());
        assert_eq!(merged.regions.len(), 2);
        assert_eq!(merged.regions[1].name, "B");
        assert_eq!(merged.regions[1].votes, vec![0.0, 0.0]);
    }

    #[test]
    fn vote_only_regions_are_reported_dropped() {
        let merged = merge_votes(vec![region("A")], &matrix());
        assert_eq!(merged.dropped, vec!["Ghost".to_string()]);
    }

    #[test]
    fn bounds_cover_zero_fill() {
        let merged = merge_votes(vec![region("A"), region("B")], &matrix());
        assert_eq!(merged.value_bounds(), Some((0.0, 10.0)));
    }

    #[test]
    fn to_matrix_round_trips_values() {
        let merged = merge_votes(vec![region("A"), region("B")], &matrix());
        let m = merged.to_matrix();
        assert_eq!(m.value("A", "cand1"), Some(10.0));
        assert_eq!(m.value("B", "cand2"), Some(0.0));
        assert_eq!(m.value("Ghost", "cand1"), None);
    }
}
