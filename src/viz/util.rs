//! Utility functions for visualization: value ranges, tick formatting, locale mapping.

use num_format::{Locale, ToFormattedString};

/// Min/max over a sample; `None` when empty or all-NaN.
pub fn value_extent(values: &[f64]) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    bounds
}

/// Pad a value range by `frac` on both sides, widening a degenerate range
/// so the axis never has zero span.
pub fn padded_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let (mut lo, mut hi) = (min, max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * frac;
    (lo - pad, hi + pad)
}

/// Map a user-provided locale tag to a `num_format::Locale`.
/// Supported tags (case-insensitive): `en`, `de`, `fr`, `es`, `it`, `pt`, `nl`.
/// Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Format a tick value: whole numbers with locale group separators
/// (`30,000` vs `30.000`), small magnitudes with adaptive precision.
pub fn format_count(v: f64, locale: &Locale) -> String {
    if !v.is_finite() {
        return String::from("NA");
    }
    if v.abs() >= 1000.0 && (v - v.round()).abs() < 1e-9 {
        return (v.round() as i64).to_formatted_string(locale);
    }
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{:.*}", prec, v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a tick value without group separators (e.g. years on an x axis):
/// whole numbers bare, small magnitudes with adaptive precision.
pub fn format_tick(v: f64) -> String {
    if !v.is_finite() {
        return String::from("NA");
    }
    if (v - v.round()).abs() < 1e-9 {
        return format!("{}", v.round() as i64);
    }
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Label for a categorical axis drawn on numeric coordinates: the category
/// name at each integer position, blank elsewhere.
pub fn category_label(categories: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    categories
        .get(i as usize)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_skips_non_finite() {
        assert_eq!(value_extent(&[1.0, f64::NAN, 3.0]), Some((1.0, 3.0)));
        assert_eq!(value_extent(&[]), None);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let (lo, hi) = padded_range(5.0, 5.0, 0.0);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn counts_use_group_separators() {
        assert_eq!(format_count(30000.0, &Locale::en), "30,000");
        assert_eq!(format_count(30000.0, &Locale::de), "30.000");
        assert_eq!(format_count(2.5, &Locale::en), "2.5");
    }

    #[test]
    fn plain_ticks_skip_group_separators() {
        assert_eq!(format_tick(2024.0), "2024");
        assert_eq!(format_tick(2.50), "2.5");
    }

    #[test]
    fn category_labels_only_on_integer_positions() {
        let cats = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&cats, 1.0), "b");
        assert_eq!(category_label(&cats, 0.6), "");
        assert_eq!(category_label(&cats, 5.0), "");
    }
}
