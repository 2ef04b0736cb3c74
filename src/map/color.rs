//! Linear value-to-color mapping for choropleth fills.

use serde::Serialize;

/// Reversed viridis anchor points: low values map to yellow, high values to
/// dark purple. Intermediate values are piecewise-linearly interpolated.
const VIRIDIS_REVERSED: [(u8, u8, u8); 5] = [
    (253, 231, 37), // yellow
    (94, 201, 98),  // green
    (33, 145, 140), // teal
    (59, 82, 139),  // blue
    (68, 1, 84),    // dark purple
];

/// Linear color scale over a fixed [low, high] value range.
///
/// Bounds are fixed at construction from the observed data; they are not
/// recomputed when the displayed candidate changes, so fills stay comparable
/// across candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    low: f64,
    high: f64,
}

impl ColorScale {
    /// Fit a scale to observed bounds.
    ///
    /// Non-finite or inverted inputs collapse to a unit scale. Equal bounds
    /// are widened by pushing the lower bound below the single value, so the
    /// scale never has zero width.
    pub fn fit(min: f64, max: f64) -> Self {
        let (mut low, mut high) = if min.is_finite() && max.is_finite() && min <= max {
            (min, max)
        } else {
            (0.0, 1.0)
        };
        if (high - low).abs() < f64::EPSILON {
            low = high - 1.0;
        }
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Normalized position of `v` on the scale, clamped to [0, 1].
    pub fn t(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return 0.0;
        }
        ((v - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
    }

    /// Interpolated fill color for a value.
    pub fn rgb(&self, v: f64) -> (u8, u8, u8) {
        let pos = self.t(v) * (VIRIDIS_REVERSED.len() - 1) as f64;
        let i = (pos.floor() as usize).min(VIRIDIS_REVERSED.len() - 2);
        let f = pos - i as f64;
        let (r0, g0, b0) = VIRIDIS_REVERSED[i];
        let (r1, g1, b1) = VIRIDIS_REVERSED[i + 1];
        (
            lerp_channel(r0, r1, f),
            lerp_channel(g0, g1, f),
            lerp_channel(b0, b1, f),
        )
    }

    /// Fill color as `#RRGGBB`.
    pub fn hex(&self, v: f64) -> String {
        let (r, g, b) = self.rgb(v);
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// The raw ramp anchors, low to high, for client-side interpolation.
    pub fn stops() -> &'static [(u8, u8, u8)] {
        &VIRIDIS_REVERSED
    }

    /// `n` evenly spaced tick values from low to high (inclusive).
    pub fn ticks(&self, n: usize) -> Vec<f64> {
        let n = n.max(2);
        (0..n)
            .map(|i| self.low + (self.high - self.low) * i as f64 / (n - 1) as f64)
            .collect()
    }
}

fn lerp_channel(a: u8, b: u8, f: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * f).round() as u8
}
