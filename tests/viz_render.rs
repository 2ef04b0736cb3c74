use scrutin_rs::DataError;
use scrutin_rs::viz::{self, ChartOptions};
use std::fs;
use std::path::PathBuf;

fn write_and_check<F: Fn(&PathBuf)>(maker: F, name: &str, ext: &str) {
    let tmp = std::env::temp_dir();
    let path: PathBuf = tmp.join(format!("scrutin_viz_{}.{}", name, ext));
    maker(&path);
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "chart file has content");
    fs::remove_file(&path).ok();
}

#[test]
fn line_chart_produces_svg() {
    let x = vec![2019.0, 2024.0, 2029.0];
    let y = vec![1200.0, 2400.0, 1800.0];
    write_and_check(
        |p| {
            let opts = ChartOptions::titled("Turnout");
            viz::line_chart(&x, &y, &opts, p, 800, 480).unwrap();
        },
        "line",
        "svg",
    );
}

#[test]
fn line_chart_without_markers() {
    let x = vec![1.0, 2.0, 3.0, 4.0];
    let y = vec![4.0, 3.0, 2.0, 1.0];
    write_and_check(
        |p| {
            let opts = ChartOptions {
                marker: false,
                ..ChartOptions::default()
            };
            viz::line_chart(&x, &y, &opts, p, 640, 400).unwrap();
        },
        "line_plain",
        "svg",
    );
}

#[test]
fn scatter_chart_produces_svg() {
    let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let y = vec![2.0, 4.0, 1.0, 5.0, 3.0];
    write_and_check(
        |p| {
            let opts = ChartOptions::titled("Spread");
            viz::scatter_chart(&x, &y, &opts, p, 800, 480).unwrap();
        },
        "scatter",
        "svg",
    );
}

#[test]
fn bar_chart_produces_svg() {
    let categories: Vec<String> = ["cand1", "cand2", "cand3"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let values = vec![30000.0, 12000.0, 4500.0];
    write_and_check(
        |p| {
            let opts = ChartOptions {
                title: "Total votes".to_string(),
                y_label: "Votes".to_string(),
                ..ChartOptions::default()
            };
            viz::bar_chart(&categories, &values, &opts, p, 800, 480).unwrap();
        },
        "bar",
        "svg",
    );
}

#[test]
fn histogram_produces_svg() {
    let data: Vec<f64> = (0..100).map(|i| ((i * 37) % 50) as f64).collect();
    write_and_check(
        |p| {
            let opts = ChartOptions {
                bins: 8,
                ..ChartOptions::default()
            };
            viz::histogram(&data, &opts, p, 800, 480).unwrap();
        },
        "hist",
        "svg",
    );
}

#[test]
fn box_chart_produces_svg() {
    let groups = vec![
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 14.0],
        vec![2.0, 2.5, 3.5, 6.0],
    ];
    let labels: Vec<String> = ["cand1", "cand2"].iter().map(|s| s.to_string()).collect();
    write_and_check(
        |p| {
            let opts = ChartOptions::titled("Distributions");
            viz::box_chart(&groups, Some(&labels), &opts, p, 800, 480).unwrap();
        },
        "box",
        "svg",
    );
}

#[test]
fn png_output_is_supported() {
    let x = vec![1.0, 2.0, 3.0];
    let y = vec![1.0, 4.0, 9.0];
    write_and_check(
        |p| {
            let opts = ChartOptions::default();
            viz::line_chart(&x, &y, &opts, p, 400, 300).unwrap();
        },
        "line_png",
        "png",
    );
}

#[test]
fn mismatched_lengths_are_rejected() {
    let err = viz::line_chart(
        &[1.0, 2.0],
        &[1.0],
        &ChartOptions::default(),
        std::env::temp_dir().join("scrutin_viz_bad.svg"),
        400,
        300,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DataError>(),
        Some(DataError::LengthMismatch { left: 2, right: 1 })
    ));
}

#[test]
fn empty_input_is_rejected() {
    let err = viz::histogram(
        &[],
        &ChartOptions::default(),
        std::env::temp_dir().join("scrutin_viz_empty.svg"),
        400,
        300,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DataError>(),
        Some(DataError::EmptyTable)
    ));
}

#[test]
fn constant_data_still_renders() {
    // Degenerate ranges must widen instead of producing a zero-span axis.
    let x = vec![1.0, 2.0, 3.0];
    let y = vec![5.0, 5.0, 5.0];
    write_and_check(
        |p| {
            viz::line_chart(&x, &y, &ChartOptions::default(), p, 400, 300).unwrap();
        },
        "flat",
        "svg",
    );
}
