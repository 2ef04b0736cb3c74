//! Public types for the visualization module.

use crate::style::ChartStyle;
use plotters::style::RGBColor;

/// Cosmetic overrides shared by all chart helpers.
///
/// Fields not relevant to a given chart kind are ignored (e.g. `bins` only
/// affects [`crate::viz::histogram`]).
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Explicit series color; defaults to a per-kind palette slot.
    pub color: Option<RGBColor>,
    /// Draw point markers on line charts.
    pub marker: bool,
    /// Histogram bin count.
    pub bins: usize,
    /// Locale tag for tick labels ("en", "de", "fr", ...).
    pub locale: String,
    pub style: ChartStyle,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            color: None,
            marker: true,
            bins: 12,
            locale: "en".to_string(),
            style: ChartStyle::default(),
        }
    }
}

impl ChartOptions {
    /// Options with a title and otherwise default cosmetics.
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}
