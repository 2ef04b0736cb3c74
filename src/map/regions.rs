//! Region geometry loading and coordinate normalization.
//!
//! Geometries come from a shapefile or GeoJSON file (dispatch on extension).
//! Each region carries the name used as the join key against vote tables.

use anyhow::{Context, Result, anyhow};
use geo::{BoundingRect, Coord, MapCoords, MultiPolygon, Rect};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One administrative region: join key plus polygon geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn new(name: &str, geometry: MultiPolygon<f64>) -> Self {
        Self {
            name: name.to_string(),
            geometry,
        }
    }
}

/// Load regions from a shapefile or GeoJSON file, taking the join key from
/// the attribute/property `name_field`. Coordinates that look like spherical
/// mercator meters are converted back to lon/lat.
pub fn load_regions<P: AsRef<Path>>(path: P, name_field: &str) -> Result<Vec<Region>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| anyhow!("geometry file has no extension: {}", path.display()))?;

    let mut regions = match extension.as_str() {
        "shp" => load_shapefile_regions(path, name_field)?,
        "json" | "geojson" => load_geojson_regions(path, name_field)?,
        _ => return Err(anyhow!("unsupported geometry format: {extension}")),
    };

    normalize_to_lonlat(&mut regions);
    log::info!("loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

fn load_shapefile_regions(path: &Path, name_field: &str) -> Result<Vec<Region>> {
    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("failed to open shapefile: {}", path.display()))?;

    let mut regions = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let name_value = record
            .get(name_field)
            .ok_or_else(|| anyhow!("join column '{name_field}' not found in shapefile"))?;
        let name = match name_value {
            shapefile::dbase::FieldValue::Character(Some(s)) => s.clone(),
            shapefile::dbase::FieldValue::Character(None) => continue,
            shapefile::dbase::FieldValue::Numeric(Some(n)) => format!("{n}"),
            _ => return Err(anyhow!("shapefile join column must be a string or number")),
        };

        let geometry = match shape {
            shapefile::Shape::Polygon(polygon) => {
                let mp: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("failed to convert polygon: {:?}", e))?;
                mp
            }
            shapefile::Shape::PolygonM(polygon) => {
                let mp: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("failed to convert polygonM: {:?}", e))?;
                mp
            }
            shapefile::Shape::PolygonZ(polygon) => {
                let mp: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("failed to convert polygonZ: {:?}", e))?;
                mp
            }
            _ => continue, // skip non-polygon shapes
        };

        regions.push(Region { name, geometry });
    }
    Ok(regions)
}

fn load_geojson_regions(path: &Path, name_field: &str) -> Result<Vec<Region>> {
    use geojson::GeoJson;

    let file = File::open(path)
        .with_context(|| format!("failed to open GeoJSON file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let geojson = GeoJson::from_reader(reader).context("failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut regions = Vec::new();
    for feature in collection.features {
        let name_val = feature
            .properties
            .as_ref()
            .and_then(|props| props.get(name_field));
        let name = match name_val {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => continue, // skip features without a usable join key
        };

        let geometry = match feature.geometry {
            Some(geom) => {
                let converted: geo::Geometry<f64> = geom
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("failed to convert GeoJSON geometry: {:?}", e))?;
                match converted {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue, // skip points/lines
                }
            }
            None => continue,
        };

        regions.push(Region { name, geometry });
    }
    Ok(regions)
}

/// Union bounding box over all region geometries.
pub fn total_bounds(regions: &[Region]) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for region in regions {
        let Some(rect) = region.geometry.bounding_rect() else {
            continue;
        };
        bounds = Some(match bounds {
            Some(acc) => Rect::new(
                Coord {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                Coord {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            ),
            None => rect,
        });
    }
    bounds
}

const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Convert geometries that look like spherical-mercator meters back to
/// lon/lat. Geometries already inside lon/lat bounds are left untouched;
/// without a bounding box there is nothing to decide and nothing changes.
pub fn normalize_to_lonlat(regions: &mut [Region]) {
    let Some(bounds) = total_bounds(regions) else {
        return;
    };
    let beyond_lonlat = bounds.min().x.abs() > 180.0
        || bounds.max().x.abs() > 180.0
        || bounds.min().y.abs() > 90.0
        || bounds.max().y.abs() > 90.0;
    if !beyond_lonlat {
        return;
    }
    log::info!("geometry coordinates look like mercator meters, converting to lon/lat");
    for region in regions.iter_mut() {
        region.geometry = region.geometry.map_coords(mercator_to_lonlat);
    }
}

fn mercator_to_lonlat(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = ((c.y / EARTH_RADIUS_M).exp().atan() * 2.0 - std::f64::consts::FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}
