//! Styled chart helpers: render single-series charts to **SVG** or **PNG**.
//!
//! Each helper applies the [`ChartStyle`](crate::style::ChartStyle) carried in
//! its [`ChartOptions`], draws exactly one chart primitive, and presents the
//! surface. The `*_chart` functions create the surface from an output path
//! (backend chosen by extension); the `draw_*_on` functions draw onto a
//! caller-supplied drawing area instead.

pub mod types;
pub mod util;

pub use types::ChartOptions;

use crate::models::DataError;
use crate::stats::quartiles;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use util::{category_label, format_count, format_tick, map_locale, padded_range, value_extent};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

fn check_lengths(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(DataError::LengthMismatch { left, right }.into());
    }
    if left == 0 {
        return Err(DataError::EmptyTable.into());
    }
    Ok(())
}

/// Styled line plot of `y` against `x`, written to `out_path`.
pub fn line_chart<P: AsRef<Path>>(
    x: &[f64],
    y: &[f64],
    opts: &ChartOptions,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    check_lengths(x.len(), y.len())?;
    ensure_fonts_registered();
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    if out_path.as_ref().extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_line_on(root, x, y, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_line_on(root, x, y, opts)
    }
}

/// Draw a styled line plot onto a supplied drawing area.
pub fn draw_line_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    x: &[f64],
    y: &[f64],
    opts: &ChartOptions,
) -> Result<()> {
    check_lengths(x.len(), y.len())?;
    let style = &opts.style;
    let color = opts
        .color
        .map(|c| c.to_rgba())
        .unwrap_or_else(|| style.color(0));
    let locale = map_locale(&opts.locale);

    let (x_min, x_max) = value_extent(x).ok_or_else(|| anyhow!("no finite x values"))?;
    let (y_min, y_max) = value_extent(y).ok_or_else(|| anyhow!("no finite y values"))?;
    let (x_lo, x_hi) = padded_range(x_min, x_max, 0.02);
    let (y_lo, y_hi) = padded_range(y_min, y_max, 0.08);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            &opts.title,
            (FontFamily::SansSerif, style.title_size as i32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| format_tick(*v);
    let y_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .x_desc(&opts.x_label)
        .y_desc(&opts.y_label)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, style.tick_size as i32))
        .axis_desc_style((FontFamily::SansSerif, style.label_size as i32))
        .axis_style(style.spine_color())
        .bold_line_style(style.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let series: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    chart
        .draw_series(LineSeries::new(
            series.clone(),
            color.stroke_width(style.line_width),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    if opts.marker {
        chart
            .draw_series(
                series
                    .iter()
                    .map(|(px, py)| Circle::new((*px, *py), style.marker_size, color.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Styled scatter plot, written to `out_path`.
pub fn scatter_chart<P: AsRef<Path>>(
    x: &[f64],
    y: &[f64],
    opts: &ChartOptions,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    check_lengths(x.len(), y.len())?;
    ensure_fonts_registered();
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    if out_path.as_ref().extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_scatter_on(root, x, y, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_scatter_on(root, x, y, opts)
    }
}

/// Draw a styled scatter plot onto a supplied drawing area.
pub fn draw_scatter_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    x: &[f64],
    y: &[f64],
    opts: &ChartOptions,
) -> Result<()> {
    check_lengths(x.len(), y.len())?;
    let style = &opts.style;
    let color = opts
        .color
        .map(|c| c.to_rgba())
        .unwrap_or_else(|| style.color(1));
    let locale = map_locale(&opts.locale);

    let (x_min, x_max) = value_extent(x).ok_or_else(|| anyhow!("no finite x values"))?;
    let (y_min, y_max) = value_extent(y).ok_or_else(|| anyhow!("no finite y values"))?;
    let (x_lo, x_hi) = padded_range(x_min, x_max, 0.02);
    let (y_lo, y_hi) = padded_range(y_min, y_max, 0.08);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            &opts.title,
            (FontFamily::SansSerif, style.title_size as i32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| format_tick(*v);
    let y_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .x_desc(&opts.x_label)
        .y_desc(&opts.y_label)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, style.tick_size as i32))
        .axis_desc_style((FontFamily::SansSerif, style.label_size as i32))
        .axis_style(style.spine_color())
        .bold_line_style(style.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let fill = color.mix(style.fill_alpha).filled();
    chart
        .draw_series(
            x.iter()
                .zip(y.iter())
                .map(|(px, py)| Circle::new((*px, *py), style.marker_size + 1, fill)),
        )
        .map_err(|e| anyhow!("{:?}", e))?;
    // White edge ring, as a separate stroked pass.
    chart
        .draw_series(
            x.iter()
                .zip(y.iter())
                .map(|(px, py)| Circle::new((*px, *py), style.marker_size + 1, WHITE.stroke_width(1))),
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Styled bar chart over categorical labels, written to `out_path`.
pub fn bar_chart<P: AsRef<Path>>(
    categories: &[String],
    values: &[f64],
    opts: &ChartOptions,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    check_lengths(categories.len(), values.len())?;
    ensure_fonts_registered();
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    if out_path.as_ref().extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_bar_on(root, categories, values, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_bar_on(root, categories, values, opts)
    }
}

/// Draw a styled bar chart onto a supplied drawing area.
///
/// Bars sit on numeric coordinates 0..n with the category names as tick
/// labels, one bar per category.
pub fn draw_bar_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    categories: &[String],
    values: &[f64],
    opts: &ChartOptions,
) -> Result<()> {
    check_lengths(categories.len(), values.len())?;
    let style = &opts.style;
    let color = opts
        .color
        .map(|c| c.to_rgba())
        .unwrap_or_else(|| style.color(2));
    let locale = map_locale(&opts.locale);

    let n = values.len();
    let (v_min, v_max) = value_extent(values).ok_or_else(|| anyhow!("no finite values"))?;
    let y_lo = 0.0f64.min(v_min);
    let (_, y_hi) = padded_range(y_lo, v_max.max(0.0), 0.12);
    let x_lo = -0.6;
    let x_hi = n as f64 - 0.4;

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            &opts.title,
            (FontFamily::SansSerif, style.title_size as i32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |x: &f64| category_label(categories, *x);
    let y_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&opts.x_label)
        .y_desc(&opts.y_label)
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, style.tick_size as i32))
        .axis_desc_style((FontFamily::SansSerif, style.label_size as i32))
        .axis_style(style.spine_color())
        .bold_line_style(style.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let half = 0.4;
    for (i, v) in values.iter().enumerate() {
        let x_center = i as f64;
        let y0 = 0.0f64.min(*v);
        let y1 = 0.0f64.max(*v);
        let rect = Rectangle::new(
            [(x_center - half, y0), (x_center + half, y1)],
            color.mix(style.fill_alpha).filled(),
        );
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Styled histogram of a sample, written to `out_path`. Bin count comes from
/// `opts.bins`.
pub fn histogram<P: AsRef<Path>>(
    data: &[f64],
    opts: &ChartOptions,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if data.is_empty() {
        return Err(DataError::EmptyTable.into());
    }
    ensure_fonts_registered();
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    if out_path.as_ref().extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_histogram_on(root, data, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_histogram_on(root, data, opts)
    }
}

/// Draw a styled histogram onto a supplied drawing area.
pub fn draw_histogram_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    data: &[f64],
    opts: &ChartOptions,
) -> Result<()> {
    if data.is_empty() {
        return Err(DataError::EmptyTable.into());
    }
    let style = &opts.style;
    let color = opts
        .color
        .map(|c| c.to_rgba())
        .unwrap_or_else(|| style.color(3));
    let locale = map_locale(&opts.locale);
    let bins = opts.bins.max(1);

    let (d_min, d_max) = value_extent(data).ok_or_else(|| anyhow!("no finite values"))?;
    let (lo, hi) = if (d_max - d_min).abs() < f64::EPSILON {
        (d_min - 0.5, d_max + 0.5)
    } else {
        (d_min, d_max)
    };
    let bin_width = (hi - lo) / bins as f64;

    let mut counts = vec![0u64; bins];
    for &v in data {
        if !v.is_finite() {
            continue;
        }
        let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0) as f64;
    let (_, y_hi) = padded_range(0.0, max_count.max(1.0), 0.08);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            &opts.title,
            (FontFamily::SansSerif, style.title_size as i32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(lo..hi, 0.0..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |v: &f64| format_count(*v, locale);
    let y_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&opts.x_label)
        .y_desc(if opts.y_label.is_empty() {
            "Count"
        } else {
            opts.y_label.as_str()
        })
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, style.tick_size as i32))
        .axis_desc_style((FontFamily::SansSerif, style.label_size as i32))
        .axis_style(style.spine_color())
        .bold_line_style(style.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (i, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let x0 = lo + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, 0.0), (x1, *count as f64)],
                color.mix(style.fill_alpha).filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, 0.0), (x1, *count as f64)],
                WHITE.stroke_width(1),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Styled box plot of one or more groups, written to `out_path`.
pub fn box_chart<P: AsRef<Path>>(
    groups: &[Vec<f64>],
    labels: Option<&[String]>,
    opts: &ChartOptions,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if groups.is_empty() || groups.iter().any(|g| g.is_empty()) {
        return Err(DataError::EmptyTable.into());
    }
    if let Some(l) = labels {
        check_lengths(groups.len(), l.len())?;
    }
    ensure_fonts_registered();
    let path_string = out_path.as_ref().to_string_lossy().into_owned();
    if out_path.as_ref().extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_box_on(root, groups, labels, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_box_on(root, groups, labels, opts)
    }
}

/// Draw a styled box plot onto a supplied drawing area.
///
/// Boxes span the interquartile range, whiskers reach the most extreme data
/// points within 1.5 IQR of the box, and points beyond that are drawn as
/// individual outliers.
pub fn draw_box_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    groups: &[Vec<f64>],
    labels: Option<&[String]>,
    opts: &ChartOptions,
) -> Result<()> {
    if groups.is_empty() || groups.iter().any(|g| g.is_empty()) {
        return Err(DataError::EmptyTable.into());
    }
    let style = &opts.style;
    let locale = map_locale(&opts.locale);
    let n = groups.len();

    let all: Vec<f64> = groups.iter().flatten().copied().collect();
    let (v_min, v_max) = value_extent(&all).ok_or_else(|| anyhow!("no finite values"))?;
    let (y_lo, y_hi) = padded_range(v_min, v_max, 0.10);
    let x_lo = -0.6;
    let x_hi = n as f64 - 0.4;

    let default_labels: Vec<String> = (1..=n).map(|i| i.to_string()).collect();
    let labels: &[String] = labels.unwrap_or(&default_labels);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            &opts.title,
            (FontFamily::SansSerif, style.title_size as i32),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |x: &f64| category_label(labels, *x);
    let y_fmt = |v: &f64| format_count(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&opts.x_label)
        .y_desc(&opts.y_label)
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, style.tick_size as i32))
        .axis_desc_style((FontFamily::SansSerif, style.label_size as i32))
        .axis_style(style.spine_color())
        .bold_line_style(style.grid_color())
        .light_line_style(TRANSPARENT)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let box_half = 0.275;
    let cap_half = box_half / 2.0;
    let whisker_color = RGBAColor(0, 0, 0, 0.55);

    for (i, group) in groups.iter().enumerate() {
        let color = style.color(i);
        let x = i as f64;
        let (q1, median, q3) =
            quartiles(group).ok_or_else(|| anyhow!("empty box plot group {i}"))?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;
        let lo_whisker = group
            .iter()
            .copied()
            .filter(|v| *v >= lo_fence)
            .fold(f64::INFINITY, f64::min);
        let hi_whisker = group
            .iter()
            .copied()
            .filter(|v| *v <= hi_fence)
            .fold(f64::NEG_INFINITY, f64::max);

        // Whiskers and caps first so the box covers their joints.
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, lo_whisker), (x, q1)],
                whisker_color,
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x, q3), (x, hi_whisker)],
                whisker_color,
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        for wy in [lo_whisker, hi_whisker] {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x - cap_half, wy), (x + cap_half, wy)],
                    whisker_color,
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - box_half, q1), (x + box_half, q3)],
                color.mix(0.75).filled(),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - box_half, q1), (x + box_half, q3)],
                WHITE.stroke_width(1),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x - box_half, median), (x + box_half, median)],
                BLACK.stroke_width(2),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;

        let outliers: Vec<(f64, f64)> = group
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .map(|v| (x, v))
            .collect();
        chart
            .draw_series(
                outliers
                    .into_iter()
                    .map(|pt| Circle::new(pt, 2, whisker_color.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
