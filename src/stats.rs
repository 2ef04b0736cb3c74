use crate::models::VoteRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one candidate across regions/years.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub candidate: String,
    pub count: usize,
    pub total: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute per-candidate statistics over a long-format vote table.
pub fn candidate_summary(records: &[VoteRecord]) -> Vec<Summary> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(r.candidate.clone()).or_default().push(r.votes);
    }

    let mut out = Vec::new();
    for (candidate, mut vals) in groups {
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let count = vals.len();
        let total: f64 = vals.iter().copied().sum();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(total / count as f64)
        } else {
            None
        };
        let median = median_of_sorted(&vals);
        out.push(Summary {
            candidate,
            count,
            total,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

/// Quartiles (q1, median, q3) of a sample, by splitting the sorted sample
/// at the median and taking the medians of the halves (Tukey hinges).
/// `None` for an empty sample.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    let median = median_of_sorted(&sorted)?;
    let half = n / 2;
    let (lower, upper) = if n % 2 == 0 {
        (&sorted[..half], &sorted[half..])
    } else {
        // Odd: the median element belongs to both hinges.
        (&sorted[..=half], &sorted[half..])
    };
    Some((median_of_sorted(lower)?, median, median_of_sorted(upper)?))
}

fn median_of_sorted(vals: &[f64]) -> Option<f64> {
    let count = vals.len();
    if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_of_even_sample() {
        let (q1, med, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(q1, 1.5);
        assert_eq!(med, 2.5);
        assert_eq!(q3, 3.5);
    }

    #[test]
    fn quartiles_of_odd_sample_include_median_in_hinges() {
        let (q1, med, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(q1, 2.0);
        assert_eq!(med, 3.0);
        assert_eq!(q3, 4.0);
    }

    #[test]
    fn quartiles_empty_is_none() {
        assert!(quartiles(&[]).is_none());
    }
}
