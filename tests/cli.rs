use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const VOTES_CSV: &str = "\
region,candidate,year,votes
A,cand1,2024,10
B,cand1,2024,20
A,cand2,2024,5
";

const REGIONS_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
{"type":"Feature","properties":{"name":"A"},"geometry":{"type":"Polygon","coordinates":[[[-12.0,20.0],[-11.0,20.0],[-11.0,21.0],[-12.0,21.0],[-12.0,20.0]]]}},
{"type":"Feature","properties":{"name":"B"},"geometry":{"type":"Polygon","coordinates":[[[-11.0,20.0],[-10.0,20.0],[-10.0,21.0],[-11.0,21.0],[-11.0,20.0]]]}}
]}"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("scrutin"));
}

#[test]
fn summary_prints_candidate_table() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    fs::write(&votes, VOTES_CSV).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["summary", "--votes"]).arg(&votes);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cand1"))
        .stdout(predicate::str::contains("cand2"));
}

#[test]
fn summary_rejects_missing_year() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    fs::write(&votes, VOTES_CSV).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["summary", "--year", "1900", "--votes"]).arg(&votes);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no vote records"));
}

#[test]
fn chart_writes_bar_svg() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    let out = dir.path().join("totals.svg");
    fs::write(&votes, VOTES_CSV).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["chart", "--kind", "bar", "--votes"])
        .arg(&votes)
        .arg("--out")
        .arg(&out);
    cmd.assert().success();
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn chart_hist_requires_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    let out = dir.path().join("hist.svg");
    fs::write(&votes, VOTES_CSV).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["chart", "--kind", "hist", "--votes"])
        .arg(&votes)
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--candidate"));
}

#[cfg(feature = "maps")]
#[test]
fn map_writes_interactive_html() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    let geometry = dir.path().join("regions.geojson");
    let out = dir.path().join("map.html");
    fs::write(&votes, VOTES_CSV).unwrap();
    fs::write(&geometry, REGIONS_GEOJSON).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["map", "--year", "2024", "--name-field", "name"])
        .arg("--geometry")
        .arg(&geometry)
        .arg("--votes")
        .arg(&votes)
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("initial: cand1"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("candidate-select"));
    assert!(html.contains("cand2"));
}

#[cfg(feature = "maps")]
#[test]
fn map_fails_loudly_for_missing_year() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    let geometry = dir.path().join("regions.geojson");
    let out = dir.path().join("map.html");
    fs::write(&votes, VOTES_CSV).unwrap();
    fs::write(&geometry, REGIONS_GEOJSON).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args(["map", "--year", "1900", "--name-field", "name"])
        .arg("--geometry")
        .arg(&geometry)
        .arg("--votes")
        .arg(&votes)
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no vote records"));
    assert!(!out.exists());
}

#[cfg(feature = "maps")]
#[test]
fn choropleth_writes_static_html() {
    let dir = tempfile::tempdir().unwrap();
    let votes = dir.path().join("votes.csv");
    let geometry = dir.path().join("regions.geojson");
    let out = dir.path().join("choropleth.html");
    fs::write(&votes, VOTES_CSV).unwrap();
    fs::write(&geometry, REGIONS_GEOJSON).unwrap();

    let mut cmd = Command::cargo_bin("scrutin").unwrap();
    cmd.args([
        "choropleth",
        "--year",
        "2024",
        "--candidate",
        "cand1",
        "--name-field",
        "name",
    ])
    .arg("--geometry")
    .arg(&geometry)
    .arg("--votes")
    .arg(&votes)
    .arg("--out")
    .arg(&out);
    cmd.assert().success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(!html.contains("candidate-select"));
    assert!(html.contains("cand1"));
}
