//! Chart styling as an explicit configuration value.
//!
//! Every drawing function takes a [`ChartStyle`] instead of mutating any
//! process-wide state, so concurrent or interleaved chart calls cannot
//! clobber each other's appearance.

use plotters::style::{RGBAColor, RGBColor};

/// Series color palette used when the caller does not override the color.
///
/// Order: blue, orange, red, purple, green, dark slate.
pub const PALETTE6: [RGBColor; 6] = [
    RGBColor(46, 134, 171), // #2E86AB
    RGBColor(241, 143, 1),  // #F18F01
    RGBColor(199, 62, 29),  // #C73E1D
    RGBColor(106, 76, 147), // #6A4C93
    RGBColor(42, 157, 143), // #2A9D8F
    RGBColor(38, 70, 83),   // #264653
];

/// Immutable bundle of font, sizing, and color values applied to each chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Chart title font size in px.
    pub title_size: u32,
    /// Axis description font size in px.
    pub label_size: u32,
    /// Tick label font size in px.
    pub tick_size: u32,
    /// Stroke width for line series.
    pub line_width: u32,
    /// Marker radius for scatter/line points.
    pub marker_size: i32,
    /// Grid line opacity, 0..1.
    pub grid_alpha: f64,
    /// Axis/spine opacity, 0..1.
    pub spine_alpha: f64,
    /// Fill opacity for bars and boxes, 0..1.
    pub fill_alpha: f64,
    /// Series palette, cycled by index.
    pub palette: Vec<RGBColor>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title_size: 20,
            label_size: 15,
            tick_size: 12,
            line_width: 2,
            marker_size: 4,
            grid_alpha: 0.25,
            spine_alpha: 0.35,
            fill_alpha: 0.9,
            palette: PALETTE6.to_vec(),
        }
    }
}

impl ChartStyle {
    /// Palette color by index (wraps around).
    pub fn color(&self, idx: usize) -> RGBAColor {
        use plotters::style::Color;
        self.palette[idx % self.palette.len()].to_rgba()
    }

    /// Grid mesh color: black at `grid_alpha`.
    pub fn grid_color(&self) -> RGBAColor {
        RGBAColor(0, 0, 0, self.grid_alpha)
    }

    /// Axis line/label color: black at `spine_alpha`.
    pub fn spine_color(&self) -> RGBAColor {
        RGBAColor(0, 0, 0, self.spine_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        let style = ChartStyle::default();
        assert_eq!(style.color(0), style.color(PALETTE6.len()));
    }
}
