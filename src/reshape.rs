//! Long-to-wide reshaping of vote tables.
//!
//! The long form is one `VoteRecord` per (region, candidate, year) triple;
//! the wide form is a [`VoteMatrix`] with one row per region and one column
//! per candidate, zero-filled for missing combinations.

use crate::models::{DataError, VoteMatrix, VoteRecord};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Filter `records` to the given election year and pivot to wide form.
///
/// Duplicate (region, candidate) rows within the year are summed. Errors
/// with [`DataError::NoRowsForYear`] when nothing matches the year.
pub fn pivot_year(records: &[VoteRecord], year: i32) -> Result<VoteMatrix> {
    let filtered: Vec<&VoteRecord> = records.iter().filter(|r| r.year == year).collect();
    if filtered.is_empty() {
        return Err(DataError::NoRowsForYear(year).into());
    }

    let candidates: BTreeSet<&str> = filtered.iter().map(|r| r.candidate.as_str()).collect();
    let mut matrix = VoteMatrix::new(candidates.into_iter().map(String::from).collect());
    for r in &filtered {
        matrix.add_votes(&r.region, &r.candidate, r.votes);
    }
    Ok(matrix)
}

/// Build a wide table from pre-aggregated per-candidate series
/// (candidate name -> region -> votes), the already-pivoted input shape.
///
/// The region set is the union across candidates; absent cells are zero.
/// Errors with [`DataError::EmptyTable`] when `series` is empty.
pub fn matrix_from_series(series: &BTreeMap<String, BTreeMap<String, f64>>) -> Result<VoteMatrix> {
    if series.is_empty() {
        return Err(DataError::EmptyTable.into());
    }
    let mut matrix = VoteMatrix::new(series.keys().cloned().collect());
    for (candidate, by_region) in series {
        for (region, votes) in by_region {
            matrix.add_votes(region, candidate, *votes);
        }
    }
    // Regions missing from some candidates still need full rows.
    for by_region in series.values() {
        for region in by_region.keys() {
            matrix.ensure_region(region);
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataError;

    fn rows() -> Vec<VoteRecord> {
        vec![
            VoteRecord::new("A", "cand1", 2024, 10.0),
            VoteRecord::new("B", "cand1", 2024, 20.0),
            VoteRecord::new("A", "cand2", 2024, 5.0),
            VoteRecord::new("A", "cand1", 2019, 99.0),
        ]
    }

    #[test]
    fn pivot_filters_year_and_zero_fills() {
        let m = pivot_year(&rows(), 2024).unwrap();
        assert_eq!(m.candidates(), &["cand1".to_string(), "cand2".to_string()]);
        assert_eq!(m.value("A", "cand1"), Some(10.0));
        assert_eq!(m.value("B", "cand1"), Some(20.0));
        assert_eq!(m.value("B", "cand2"), Some(0.0));
    }

    #[test]
    fn pivot_errors_on_missing_year() {
        let err = pivot_year(&rows(), 1999).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NoRowsForYear(1999))
        ));
        assert!(err.to_string().contains("1999"));
    }

    #[test]
    fn round_trip_recovers_totals() {
        let input = rows();
        let m = pivot_year(&input, 2024).unwrap();
        let long = m.to_long();
        for r in input.iter().filter(|r| r.year == 2024) {
            let total: f64 = long
                .iter()
                .filter(|(reg, cand, _)| reg == &r.region && cand == &r.candidate)
                .map(|(_, _, v)| v)
                .sum();
            assert_eq!(total, r.votes);
        }
    }

    #[test]
    fn series_union_covers_all_regions() {
        let mut series = BTreeMap::new();
        series.insert(
            "x".to_string(),
            BTreeMap::from([("A".to_string(), 1.0), ("B".to_string(), 2.0)]),
        );
        series.insert("y".to_string(), BTreeMap::from([("C".to_string(), 3.0)]));
        let m = matrix_from_series(&series).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.value("C", "x"), Some(0.0));
        assert_eq!(m.value("C", "y"), Some(3.0));
    }
}
