//! Standalone HTML assembly for the interactive choropleth figure.
//!
//! The document loads Leaflet from a CDN, embeds the merged GeoJSON and the
//! color scale as data, and wires the candidate dropdown as a pure
//! client-side swap of which property is read as the displayed column. No
//! server round trip is involved after the file is written.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use num_format::Locale;

use crate::viz::util::format_count;

use super::color::ColorScale;

/// Initial view of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    /// Fit the given lat/lon bounds (south, west, north, east).
    Fit {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    /// Center on a point at a fixed zoom level.
    Center { lat: f64, lon: f64, zoom: f64 },
}

/// Used whenever the data bounds cannot be computed.
pub const FALLBACK_VIEWPORT: Viewport = Viewport::Center {
    lat: 21.2,
    lon: -11.2,
    zoom: 5.0,
};

pub(crate) struct MapDocument<'a> {
    pub title_prefix: &'a str,
    pub candidates: &'a [String],
    pub initial: &'a str,
    pub scale: &'a ColorScale,
    /// Serialized GeoJSON FeatureCollection with one numeric property per
    /// candidate and a `region` name property.
    pub geojson: &'a str,
    pub width: u32,
    pub height: u32,
    pub basemap: bool,
    pub viewport: Viewport,
}

const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";

const PAGE_CSS: &str = "
    body {
        font-family: 'DejaVu Sans', Arial, sans-serif;
        margin: 24px;
        color: #222;
    }
    h2 { margin: 0 0 12px 0; }
    .controls { margin-bottom: 12px; }
    .controls select { font-size: 14px; padding: 2px 6px; }
    #map { border: 1px solid #999; }
    .legend { margin-top: 10px; }
    .legend-bar { height: 14px; border: 1px solid #777; }
    .legend-labels {
        display: flex;
        justify-content: space-between;
        font-size: 12px;
        margin-top: 2px;
    }
    .footer { margin-top: 16px; font-size: 11px; color: #888; }
";

const MAP_JS: &str = "
    const map = L.map('map');
    if (VIEWPORT.kind === 'fit') {
        map.fitBounds([[VIEWPORT.south, VIEWPORT.west], [VIEWPORT.north, VIEWPORT.east]]);
    } else {
        map.setView([VIEWPORT.lat, VIEWPORT.lon], VIEWPORT.zoom);
    }
    if (BASEMAP) {
        L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap contributors &copy; CARTO',
            opacity: 0.6,
        }).addTo(map);
    }

    function fillColor(value) {
        const span = SCALE.high - SCALE.low;
        let t = span > 0 ? (value - SCALE.low) / span : 0;
        t = Math.max(0, Math.min(1, t));
        const pos = t * (SCALE.stops.length - 1);
        const i = Math.min(Math.floor(pos), SCALE.stops.length - 2);
        const f = pos - i;
        const mix = (a, b) => Math.round(a + (b - a) * f);
        const lo = SCALE.stops[i], hi = SCALE.stops[i + 1];
        return 'rgb(' + mix(lo[0], hi[0]) + ',' + mix(lo[1], hi[1]) + ',' + mix(lo[2], hi[2]) + ')';
    }

    function styleFor(feature) {
        return {
            fillColor: fillColor(feature.properties[active] || 0),
            color: '#000',
            weight: 0.5,
            fillOpacity: 0.7,
        };
    }

    function tooltipFor(feature) {
        const votes = (feature.properties[active] || 0).toLocaleString();
        return '<b>' + feature.properties.region + '</b><br>' + active + ': ' + votes;
    }

    const layer = L.geoJSON(GEOJSON, {
        style: styleFor,
        onEachFeature: (feature, l) => l.bindTooltip(tooltipFor(feature), { sticky: true }),
    }).addTo(map);

    // Swap the displayed column entirely on the client: restyle the existing
    // layer and refresh tooltips from the already-embedded properties.
    function setActive(candidate) {
        active = candidate;
        layer.setStyle(styleFor);
        layer.eachLayer((l) => l.setTooltipContent(tooltipFor(l.feature)));
        document.getElementById('map-title').textContent = TITLE_PREFIX + ' : ' + active;
    }

    const select = document.getElementById('candidate-select');
    if (select) {
        select.addEventListener('change', (e) => setActive(e.target.value));
    }
";

pub(crate) fn render_document(doc: &MapDocument) -> String {
    let data = data_script(doc);
    let gradient = css_gradient();
    let tick_labels: Vec<String> = doc
        .scale
        .ticks(5)
        .into_iter()
        .map(|v| format_count(v, &Locale::en))
        .collect();
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();

    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (doc.title_prefix) }
                link rel="stylesheet" href=(LEAFLET_CSS);
                script src=(LEAFLET_JS) {}
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                h2 id="map-title" { (doc.title_prefix) " : " (doc.initial) }
                @if doc.candidates.len() > 1 {
                    div class="controls" {
                        label for="candidate-select" { "Candidate: " }
                        select id="candidate-select" {
                            @for candidate in doc.candidates {
                                option value=(candidate) selected?[candidate.as_str() == doc.initial] {
                                    (candidate)
                                }
                            }
                        }
                    }
                }
                div id="map" style=(format!("width:{}px;height:{}px;", doc.width, doc.height)) {}
                div class="legend" style=(format!("width:{}px;", doc.width)) {
                    div class="legend-bar" style=(format!("background:linear-gradient(to right,{gradient});")) {}
                    div class="legend-labels" {
                        @for label in &tick_labels {
                            span { (label) }
                        }
                    }
                }
                div class="footer" { "Generated " (generated) }
                script { (PreEscaped(data)) }
                script { (PreEscaped(MAP_JS)) }
            }
        }
    };
    markup.into_string()
}

/// The generated data prologue: everything the static script reads.
fn data_script(doc: &MapDocument) -> String {
    let stops: Vec<[u8; 3]> = ColorScale::stops()
        .iter()
        .map(|&(r, g, b)| [r, g, b])
        .collect();
    let scale = serde_json::json!({
        "low": doc.scale.low(),
        "high": doc.scale.high(),
        "stops": stops,
    });
    let viewport = match doc.viewport {
        Viewport::Fit {
            south,
            west,
            north,
            east,
        } => serde_json::json!({
            "kind": "fit", "south": south, "west": west, "north": north, "east": east,
        }),
        Viewport::Center { lat, lon, zoom } => serde_json::json!({
            "kind": "center", "lat": lat, "lon": lon, "zoom": zoom,
        }),
    };
    format!(
        "const GEOJSON = {};\nconst SCALE = {};\nconst VIEWPORT = {};\nconst BASEMAP = {};\nconst TITLE_PREFIX = {};\nlet active = {};",
        doc.geojson,
        scale,
        viewport,
        doc.basemap,
        serde_json::json!(doc.title_prefix),
        serde_json::json!(doc.initial),
    )
}

fn css_gradient() -> String {
    let stops = ColorScale::stops();
    let last = (stops.len() - 1) as f64;
    stops
        .iter()
        .enumerate()
        .map(|(i, &(r, g, b))| {
            format!(
                "#{:02X}{:02X}{:02X} {:.0}%",
                r,
                g,
                b,
                i as f64 / last * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}
