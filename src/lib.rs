//! scrutin-rs
//!
//! A lightweight Rust library for loading, reshaping, charting, and mapping
//! election-results data. Pairs with the `scrutin` CLI.
//!
//! ### Features
//! - Load long-format vote tables from CSV files or URLs
//! - Pivot to one column per candidate, zero-filled, and join onto region
//!   geometries (shapefile or GeoJSON)
//! - Styled single-series charts (line, scatter, bar, histogram, box plot)
//!   rendered to SVG/PNG
//! - Interactive choropleth maps with a client-side candidate dropdown,
//!   written as standalone HTML
//!
//! ### Example
//! ```no_run
//! use scrutin_rs::map::{self, MapOptions};
//!
//! let figure = map::election_map_from_files(
//!     "mrshape/adm2.shp",
//!     "https://example.org/elections.csv",
//!     2024,
//!     "ADM2_EN",
//!     &MapOptions::default(),
//! )?;
//! figure.write_html("elections_2024.html")?;
//! println!("initial candidate: {}", figure.initial);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod models;
pub mod reshape;
pub mod stats;
pub mod storage;
pub mod style;
pub mod viz;

#[cfg(feature = "maps")]
pub mod map;

pub use models::{DataError, VoteMatrix, VoteRecord};
pub use style::ChartStyle;
