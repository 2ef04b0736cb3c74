//! Interactive choropleth maps of election results.
//!
//! Three builders produce an [`ElectionMap`] figure:
//!
//! - [`election_map`] takes region geometries plus a long-format vote table
//!   and an election year (with [`election_map_from_files`] doing the
//!   file/URL loading first),
//! - [`election_map_from_series`] takes pre-aggregated per-candidate series,
//! - [`choropleth_map`] renders a single numeric column with no dropdown.
//!
//! The figure serializes to a standalone HTML document; see [`html`] for the
//! client-side behavior.

pub mod color;
pub mod html;
pub mod merge;
pub mod regions;

pub use color::ColorScale;
pub use html::{FALLBACK_VIEWPORT, Viewport};
pub use merge::{MergedVotes, RegionVotes, merge_votes};
pub use regions::{Region, load_regions};

use crate::models::{DataError, VoteMatrix, VoteRecord};
use crate::reshape;
use crate::storage;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use html::MapDocument;

/// Cosmetic parameters shared by the map builders.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Title prefix; the active candidate is appended after it.
    pub title: String,
    /// Map width in pixels.
    pub width: u32,
    /// Map height in pixels.
    pub height: u32,
    /// Zoom level for [`choropleth_map`], which centers instead of fitting
    /// bounds.
    pub zoom: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: "Election results".to_string(),
            width: 800,
            height: 600,
            zoom: 6.0,
        }
    }
}

/// An interactive choropleth figure plus the objects that built it.
///
/// `scale` and `table` are the supporting color scale and merged wide table,
/// returned for further composition; `to_html`/`write_html` serialize the
/// figure itself.
#[derive(Debug, Clone)]
pub struct ElectionMap {
    pub title: String,
    pub candidates: Vec<String>,
    /// The initially displayed candidate (first column).
    pub initial: String,
    pub scale: ColorScale,
    pub table: VoteMatrix,
    /// Vote-table regions that had no matching geometry.
    pub dropped: Vec<String>,
    html: String,
}

impl ElectionMap {
    /// The standalone HTML document.
    pub fn to_html(&self) -> &str {
        &self.html
    }

    /// Write the standalone HTML document to a file.
    pub fn write_html<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.html)
            .with_context(|| format!("failed to write map HTML to {}", path.display()))?;
        log::info!("wrote map with {} candidate(s) to {}", self.candidates.len(), path.display());
        Ok(())
    }
}

/// Build an interactive election map from geometries and a long vote table.
///
/// Filters `votes` to `year`, pivots to one column per candidate, joins onto
/// `regions` (geometry authoritative, zero fill), and wires a dropdown that
/// swaps the displayed column client-side. The color scale is fit once to
/// the global min/max across all candidates.
pub fn election_map(
    regions: Vec<Region>,
    votes: &[VoteRecord],
    year: i32,
    opts: &MapOptions,
) -> Result<ElectionMap> {
    let matrix = reshape::pivot_year(votes, year)?;
    build_map(regions, &matrix, opts, true, None)
}

/// [`election_map`], loading the geometry file and the vote CSV (path or
/// URL) first. `name_field` is the geometry attribute holding the region
/// name.
pub fn election_map_from_files<P: AsRef<Path>>(
    geometry_path: P,
    votes_source: &str,
    year: i32,
    name_field: &str,
    opts: &MapOptions,
) -> Result<ElectionMap> {
    let regions = regions::load_regions(geometry_path, name_field)?;
    let votes = storage::read_csv_auto(votes_source)?;
    election_map(regions, &votes, year, opts)
}

/// Build an election map from pre-aggregated series
/// (candidate name -> region -> votes), skipping the filter/pivot steps.
/// Drawn without a tile basemap.
pub fn election_map_from_series(
    regions: Vec<Region>,
    series: &BTreeMap<String, BTreeMap<String, f64>>,
    opts: &MapOptions,
) -> Result<ElectionMap> {
    let matrix = reshape::matrix_from_series(series)?;
    build_map(regions, &matrix, opts, false, None)
}

/// Render a single numeric column as a static choropleth with hover and a
/// tile basemap, centered on the data's bounding-box centroid at
/// `opts.zoom`. No dropdown is emitted for a single column.
pub fn choropleth_map(
    regions: Vec<Region>,
    values: &BTreeMap<String, f64>,
    label: &str,
    opts: &MapOptions,
) -> Result<ElectionMap> {
    let mut matrix = VoteMatrix::new(vec![label.to_string()]);
    for (region, v) in values {
        matrix.add_votes(region, label, *v);
    }
    build_map(regions, &matrix, opts, true, Some(opts.zoom))
}

fn build_map(
    regions: Vec<Region>,
    matrix: &VoteMatrix,
    opts: &MapOptions,
    basemap: bool,
    center_zoom: Option<f64>,
) -> Result<ElectionMap> {
    let initial = matrix
        .first_candidate()
        .ok_or(DataError::EmptyTable)?
        .to_string();

    // Viewport comes from the raw geometry; any failure there degrades to
    // the fixed fallback view instead of an error.
    let viewport = match center_zoom {
        Some(zoom) => center_viewport(&regions, zoom),
        None => fit_viewport(&regions),
    };

    let merged = merge_votes(regions, matrix);
    let scale = match merged.value_bounds() {
        Some((lo, hi)) => ColorScale::fit(lo, hi),
        None => ColorScale::fit(0.0, 1.0),
    };
    let geojson = build_geojson(&merged);

    let doc = MapDocument {
        title_prefix: &opts.title,
        candidates: &merged.candidates,
        initial: &initial,
        scale: &scale,
        geojson: &geojson,
        width: opts.width,
        height: opts.height,
        basemap,
        viewport,
    };
    let document = html::render_document(&doc);

    Ok(ElectionMap {
        title: format!("{} : {}", opts.title, initial),
        candidates: merged.candidates.clone(),
        initial,
        scale,
        table: merged.to_matrix(),
        dropped: merged.dropped.clone(),
        html: document,
    })
}

/// GeoJSON FeatureCollection with a `region` name property plus one numeric
/// property per candidate, so the client can swap columns without new data.
fn build_geojson(merged: &MergedVotes) -> String {
    use geojson::{Feature, FeatureCollection, GeoJson};

    let features = merged
        .regions
        .iter()
        .map(|r| {
            let mut props = serde_json::Map::new();
            props.insert("region".to_string(), serde_json::Value::from(r.name.clone()));
            for (candidate, votes) in merged.candidates.iter().zip(&r.votes) {
                props.insert(candidate.clone(), serde_json::Value::from(*votes));
            }
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&r.geometry))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
    .to_string()
}

/// Viewport fitting the padded data bounds (8% on each side), or the
/// fallback view when bounds are missing or degenerate.
fn fit_viewport(regions: &[Region]) -> Viewport {
    let Some(rect) = regions::total_bounds(regions) else {
        return FALLBACK_VIEWPORT;
    };
    let span_x = rect.max().x - rect.min().x;
    let span_y = rect.max().y - rect.min().y;
    if span_x <= 0.0 && span_y <= 0.0 {
        return FALLBACK_VIEWPORT;
    }
    let pad_x = if span_x > 0.0 { span_x * 0.08 } else { 0.5 };
    let pad_y = if span_y > 0.0 { span_y * 0.08 } else { 0.5 };
    Viewport::Fit {
        south: rect.min().y - pad_y,
        west: rect.min().x - pad_x,
        north: rect.max().y + pad_y,
        east: rect.max().x + pad_x,
    }
}

/// Viewport centered on the bounding-box centroid at a fixed zoom, or the
/// fallback view when bounds are missing.
fn center_viewport(regions: &[Region], zoom: f64) -> Viewport {
    match regions::total_bounds(regions) {
        Some(rect) => Viewport::Center {
            lat: rect.center().y,
            lon: rect.center().x,
            zoom,
        },
        None => FALLBACK_VIEWPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use geo::MultiPolygon;

    fn region(name: &str, x0: f64) -> Region {
        Region::new(
            name,
            MultiPolygon::new(vec![polygon![
                (x: x0, y: 0.0),
                (x: x0 + 1.0, y: 0.0),
                (x: x0 + 1.0, y: 1.0),
                (x: x0, y: 1.0),
                (x: x0, y: 0.0),
            ]]),
        )
    }

    #[test]
    fn fit_viewport_pads_bounds() {
        let regions = vec![region("A", 0.0), region("B", 9.0)];
        match fit_viewport(&regions) {
            Viewport::Fit {
                south,
                west,
                north,
                east,
            } => {
                assert!(west < 0.0 && east > 10.0);
                assert!(south < 0.0 && north > 1.0);
            }
            other => panic!("expected fit viewport, got {other:?}"),
        }
    }

    #[test]
    fn empty_geometry_falls_back() {
        assert_eq!(fit_viewport(&[]), FALLBACK_VIEWPORT);
        assert_eq!(center_viewport(&[], 4.0), FALLBACK_VIEWPORT);
    }

    #[test]
    fn center_viewport_uses_bbox_centroid() {
        let regions = vec![region("A", 0.0)];
        match center_viewport(&regions, 7.0) {
            Viewport::Center { lat, lon, zoom } => {
                assert_eq!(lat, 0.5);
                assert_eq!(lon, 0.5);
                assert_eq!(zoom, 7.0);
            }
            other => panic!("expected center viewport, got {other:?}"),
        }
    }
}
