use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors for malformed or empty input data.
///
/// I/O and rendering failures stay on `anyhow`; these are the data-shape
/// conditions callers may want to match on.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no vote records found for year {0}")]
    NoRowsForYear(i32),
    #[error("vote table is empty")]
    EmptyTable,
    #[error("input sequences have mismatched lengths ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("column '{0}' not found in CSV header")]
    MissingColumn(String),
}

/// Tidy structure used by this crate (one row = one observation):
/// votes for one candidate in one region in one election year.
/// The CSV schema is `region,candidate,year,votes`; the original dataset's
/// column names (`moughataa`, `nb_votes`) are accepted as aliases on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteRecord {
    #[serde(alias = "moughataa")]
    pub region: String,
    pub candidate: String,
    pub year: i32,
    #[serde(alias = "nb_votes")]
    pub votes: f64,
}

impl VoteRecord {
    pub fn new(region: &str, candidate: &str, year: i32, votes: f64) -> Self {
        Self {
            region: region.to_string(),
            candidate: candidate.to_string(),
            year,
            votes,
        }
    }
}

/// Wide-format vote table: one row per region, one column per candidate.
///
/// Candidate columns are kept in lexicographic order, which also defines the
/// "first" (initially displayed) candidate. Missing (region, candidate)
/// combinations hold `0.0`; duplicate long-form rows are summed on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteMatrix {
    candidates: Vec<String>,
    rows: BTreeMap<String, Vec<f64>>,
}

impl VoteMatrix {
    /// Create an empty matrix with the given candidate columns.
    /// Columns are sorted and deduplicated.
    pub fn new(mut candidates: Vec<String>) -> Self {
        candidates.sort();
        candidates.dedup();
        Self {
            candidates,
            rows: BTreeMap::new(),
        }
    }

    /// Candidate columns in display order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The initially displayed candidate (first column), if any.
    pub fn first_candidate(&self) -> Option<&str> {
        self.candidates.first().map(|s| s.as_str())
    }

    pub fn candidate_index(&self, candidate: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c == candidate)
    }

    /// Region names in lexicographic order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ensure a region row exists (all zeros if new).
    pub fn ensure_region(&mut self, region: &str) {
        let width = self.candidates.len();
        self.rows
            .entry(region.to_string())
            .or_insert_with(|| vec![0.0; width]);
    }

    /// Add votes to a (region, candidate) cell, creating the row if needed.
    /// Unknown candidates are ignored; columns are fixed at construction.
    pub fn add_votes(&mut self, region: &str, candidate: &str, votes: f64) {
        let Some(idx) = self.candidate_index(candidate) else {
            return;
        };
        self.ensure_region(region);
        if let Some(row) = self.rows.get_mut(region) {
            row[idx] += votes;
        }
    }

    /// Per-candidate votes for one region, in column order.
    pub fn row(&self, region: &str) -> Option<&[f64]> {
        self.rows.get(region).map(|v| v.as_slice())
    }

    pub fn value(&self, region: &str, candidate: &str) -> Option<f64> {
        let idx = self.candidate_index(candidate)?;
        self.rows.get(region).map(|row| row[idx])
    }

    /// Global (min, max) across every candidate column of every row.
    /// `None` when the matrix holds no rows or no columns.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for row in self.rows.values() {
            for &v in row {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        bounds
    }

    /// Melt back to long form as (region, candidate, votes) triples,
    /// zero cells included. Summed duplicates stay summed.
    pub fn to_long(&self) -> Vec<(String, String, f64)> {
        let mut out = Vec::with_capacity(self.rows.len() * self.candidates.len());
        for (region, row) in &self.rows {
            for (idx, candidate) in self.candidates.iter().enumerate() {
                out.push((region.clone(), candidate.clone(), row[idx]));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_sorted_and_deduped() {
        let m = VoteMatrix::new(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(m.candidates(), &["a".to_string(), "b".to_string()]);
        assert_eq!(m.first_candidate(), Some("a"));
    }

    #[test]
    fn add_votes_sums_duplicates_and_zero_fills() {
        let mut m = VoteMatrix::new(vec!["x".into(), "y".into()]);
        m.add_votes("North", "x", 10.0);
        m.add_votes("North", "x", 5.0);
        m.ensure_region("South");
        assert_eq!(m.value("North", "x"), Some(15.0));
        assert_eq!(m.value("North", "y"), Some(0.0));
        assert_eq!(m.value("South", "x"), Some(0.0));
        assert_eq!(m.value_bounds(), Some((0.0, 15.0)));
    }

    #[test]
    fn unknown_candidate_is_ignored() {
        let mut m = VoteMatrix::new(vec!["x".into()]);
        m.add_votes("North", "nope", 3.0);
        assert!(m.is_empty());
    }
}
