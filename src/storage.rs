use crate::models::VoteRecord;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Load a long-format vote table from a CSV file.
///
/// Expects a header row; `moughataa`/`nb_votes` are accepted for
/// `region`/`votes` (the original dataset's column names).
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<VoteRecord>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    let mut rdr = ReaderBuilder::new().from_reader(file);
    let mut out = Vec::new();
    for result in rdr.deserialize() {
        let record: VoteRecord =
            result.with_context(|| format!("malformed vote row in {}", path.display()))?;
        out.push(record);
    }
    log::info!("loaded {} vote records from {}", out.len(), path.display());
    Ok(out)
}

/// Fetch a long-format vote table from an HTTP(S) URL.
pub fn fetch_csv(url: &str) -> Result<Vec<VoteRecord>> {
    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("scrutin_rs/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let body = http
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("failed to fetch CSV from {url}"))?
        .text()
        .context("failed to read CSV response body")?;

    let mut rdr = ReaderBuilder::new().from_reader(body.as_bytes());
    let mut out = Vec::new();
    for result in rdr.deserialize() {
        let record: VoteRecord =
            result.with_context(|| format!("malformed vote row from {url}"))?;
        out.push(record);
    }
    log::info!("fetched {} vote records from {url}", out.len());
    Ok(out)
}

/// Read a vote table from a local path or an HTTP(S) URL.
pub fn read_csv_auto(source: &str) -> Result<Vec<VoteRecord>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_csv(source)
    } else {
        load_csv(source)
    }
}

/// Save observations as CSV with header.
pub fn save_csv<P: AsRef<Path>>(records: &[VoteRecord], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[VoteRecord], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("votes.csv");
        let jsonp = dir.path().join("votes.json");
        let rows = vec![
            VoteRecord::new("Nouakchott", "cand1", 2024, 1200.0),
            VoteRecord::new("Atar", "cand2", 2024, 340.0),
        ];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();

        let back = load_csv(&csvp).unwrap();
        assert_eq!(back, rows);
        assert!(jsonp.exists());
    }

    #[test]
    fn original_column_names_are_accepted() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("legacy.csv");
        std::fs::write(
            &csvp,
            "moughataa,candidate,year,nb_votes\nAtar,cand1,2024,42\n",
        )
        .unwrap();
        let rows = load_csv(&csvp).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Atar");
        assert_eq!(rows[0].votes, 42.0);
    }
}
