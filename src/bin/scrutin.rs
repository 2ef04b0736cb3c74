use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use std::collections::BTreeMap;
use std::path::PathBuf;

use scrutin_rs::viz::{self, ChartOptions};
use scrutin_rs::{stats, storage};

#[derive(Parser, Debug)]
#[command(
    name = "scrutin",
    version,
    about = "Load, reshape, chart & map election results"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an interactive choropleth map with a candidate dropdown.
    #[cfg(feature = "maps")]
    Map(MapArgs),
    /// Render one candidate's votes as a static choropleth.
    #[cfg(feature = "maps")]
    Choropleth(ChoroplethArgs),
    /// Render a chart from a vote table.
    Chart(ChartArgs),
    /// Print per-candidate statistics.
    Summary(SummaryArgs),
}

#[cfg(feature = "maps")]
#[derive(Args, Debug)]
struct MapArgs {
    /// Geometry file (.shp, .geojson or .json).
    #[arg(short, long)]
    geometry: PathBuf,
    /// Vote table CSV: a file path or an http(s) URL.
    #[arg(short, long)]
    votes: String,
    /// Election year to visualize.
    #[arg(short, long)]
    year: i32,
    /// Geometry attribute holding the region name.
    #[arg(long, default_value = "ADM2_EN")]
    name_field: String,
    /// Output HTML path.
    #[arg(short, long)]
    out: PathBuf,
    /// Title prefix shown above the map.
    #[arg(long, default_value = "Election results")]
    title: String,
    /// Width of the map (default 800).
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Height of the map (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[cfg(feature = "maps")]
#[derive(Args, Debug)]
struct ChoroplethArgs {
    /// Geometry file (.shp, .geojson or .json).
    #[arg(short, long)]
    geometry: PathBuf,
    /// Vote table CSV: a file path or an http(s) URL.
    #[arg(short, long)]
    votes: String,
    /// Election year to visualize.
    #[arg(short, long)]
    year: i32,
    /// Candidate whose votes color the map.
    #[arg(short, long)]
    candidate: String,
    /// Geometry attribute holding the region name.
    #[arg(long, default_value = "ADM2_EN")]
    name_field: String,
    /// Output HTML path.
    #[arg(short, long)]
    out: PathBuf,
    /// Title prefix shown above the map.
    #[arg(long, default_value = "Election results")]
    title: String,
    /// Zoom level for the centered view.
    #[arg(long, default_value_t = 6.0)]
    zoom: f64,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartKind {
    /// Total votes per candidate.
    Bar,
    /// Distribution of one candidate's per-region votes.
    Hist,
    /// Per-candidate vote distributions side by side.
    Box,
    /// One candidate's total votes across years.
    Line,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Vote table CSV: a file path or an http(s) URL.
    #[arg(short, long)]
    votes: String,
    /// Restrict to one election year.
    #[arg(short, long)]
    year: Option<i32>,
    /// Chart kind.
    #[arg(short, long, value_enum)]
    kind: ChartKind,
    /// Candidate (required for hist and line).
    #[arg(short, long)]
    candidate: Option<String>,
    /// Output path (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    #[arg(long, default_value = "")]
    title: String,
    /// Locale for tick labels (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Vote table CSV: a file path or an http(s) URL.
    #[arg(short, long)]
    votes: String,
    /// Restrict to one election year.
    #[arg(short, long)]
    year: Option<i32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        #[cfg(feature = "maps")]
        Command::Map(args) => cmd_map(args),
        #[cfg(feature = "maps")]
        Command::Choropleth(args) => cmd_choropleth(args),
        Command::Chart(args) => cmd_chart(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

#[cfg(feature = "maps")]
fn cmd_map(args: MapArgs) -> Result<()> {
    use scrutin_rs::map::{MapOptions, election_map_from_files};

    let opts = MapOptions {
        title: args.title,
        width: args.width,
        height: args.height,
        ..MapOptions::default()
    };
    let figure = election_map_from_files(
        &args.geometry,
        &args.votes,
        args.year,
        &args.name_field,
        &opts,
    )?;
    if !figure.dropped.is_empty() {
        eprintln!(
            "warning: {} vote region(s) missing from geometry: {}",
            figure.dropped.len(),
            figure.dropped.join(", ")
        );
    }
    figure.write_html(&args.out)?;
    println!(
        "wrote {} ({} candidates, initial: {})",
        args.out.display(),
        figure.candidates.len(),
        figure.initial
    );
    Ok(())
}

#[cfg(feature = "maps")]
fn cmd_choropleth(args: ChoroplethArgs) -> Result<()> {
    use scrutin_rs::map::{MapOptions, choropleth_map, load_regions};
    use scrutin_rs::reshape;

    let regions = load_regions(&args.geometry, &args.name_field)?;
    let records = storage::read_csv_auto(&args.votes)?;
    let matrix = reshape::pivot_year(&records, args.year)?;
    let values: BTreeMap<String, f64> = matrix
        .regions()
        .filter_map(|r| matrix.value(r, &args.candidate).map(|v| (r.to_string(), v)))
        .collect();
    if values.is_empty() {
        anyhow::bail!("candidate '{}' not found in year {}", args.candidate, args.year);
    }

    let opts = MapOptions {
        title: args.title,
        width: args.width,
        height: args.height,
        zoom: args.zoom,
    };
    let figure = choropleth_map(regions, &values, &args.candidate, &opts)?;
    figure.write_html(&args.out)?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_chart(args: ChartArgs) -> Result<()> {
    let mut records = storage::read_csv_auto(&args.votes)?;
    if let Some(year) = args.year {
        records.retain(|r| r.year == year);
        if records.is_empty() {
            return Err(scrutin_rs::DataError::NoRowsForYear(year).into());
        }
    }

    let opts = ChartOptions {
        title: args.title.clone(),
        locale: args.locale.clone(),
        ..ChartOptions::default()
    };

    match args.kind {
        ChartKind::Bar => {
            let summaries = stats::candidate_summary(&records);
            let categories: Vec<String> = summaries.iter().map(|s| s.candidate.clone()).collect();
            let values: Vec<f64> = summaries.iter().map(|s| s.total).collect();
            let opts = ChartOptions {
                y_label: "Votes".to_string(),
                ..opts
            };
            viz::bar_chart(&categories, &values, &opts, &args.out, args.width, args.height)?;
        }
        ChartKind::Hist => {
            let candidate = require_candidate(&args)?;
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.candidate == candidate)
                .map(|r| r.votes)
                .collect();
            let opts = ChartOptions {
                x_label: "Votes per region".to_string(),
                ..opts
            };
            viz::histogram(&values, &opts, &args.out, args.width, args.height)?;
        }
        ChartKind::Box => {
            let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
            for r in &records {
                groups.entry(r.candidate.clone()).or_default().push(r.votes);
            }
            let labels: Vec<String> = groups.keys().cloned().collect();
            let data: Vec<Vec<f64>> = groups.into_values().collect();
            let opts = ChartOptions {
                y_label: "Votes".to_string(),
                ..opts
            };
            viz::box_chart(&data, Some(&labels), &opts, &args.out, args.width, args.height)?;
        }
        ChartKind::Line => {
            let candidate = require_candidate(&args)?;
            let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
            for r in records.iter().filter(|r| r.candidate == candidate) {
                *by_year.entry(r.year).or_default() += r.votes;
            }
            let x: Vec<f64> = by_year.keys().map(|y| *y as f64).collect();
            let y: Vec<f64> = by_year.values().copied().collect();
            let opts = ChartOptions {
                x_label: "Year".to_string(),
                y_label: "Votes".to_string(),
                ..opts
            };
            viz::line_chart(&x, &y, &opts, &args.out, args.width, args.height)?;
        }
    }
    println!("wrote {}", args.out.display());
    Ok(())
}

fn require_candidate(args: &ChartArgs) -> Result<String> {
    args.candidate
        .clone()
        .ok_or_else(|| anyhow::anyhow!("--candidate is required for this chart kind"))
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let mut records = storage::read_csv_auto(&args.votes)?;
    if let Some(year) = args.year {
        records.retain(|r| r.year == year);
        if records.is_empty() {
            return Err(scrutin_rs::DataError::NoRowsForYear(year).into());
        }
    }

    let summaries = stats::candidate_summary(&records);
    println!(
        "{:<28} {:>6} {:>12} {:>10} {:>10} {:>10} {:>10}",
        "candidate", "rows", "total", "min", "max", "mean", "median"
    );
    for s in summaries {
        println!(
            "{:<28} {:>6} {:>12} {:>10} {:>10} {:>10} {:>10}",
            s.candidate,
            s.count,
            (s.total.round() as i64).to_formatted_string(&Locale::en),
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
        );
    }
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}
