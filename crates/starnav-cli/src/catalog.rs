//! Star catalog loading from CSV or JSON files.
//!
//! CSV files need `id`, `name`, `x`, `y` and `z` columns; `spectral_class`
//! and `polity` are optional. Header names are matched case-insensitively.
//! Files ending in `.json` are read as an array of star records.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info};

use starnav_lib::{Position, StarRecord};

/// Environment variable naming the default catalog file.
pub const CATALOG_ENV: &str = "STARNAV_CATALOG";

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    spectral_class: Option<String>,
    #[serde(default)]
    polity: Option<String>,
}

impl From<CsvRow> for StarRecord {
    fn from(row: CsvRow) -> Self {
        let mut record = StarRecord::new(row.id, row.name, Position::new(row.x, row.y, row.z));
        record.metadata.spectral_class = row.spectral_class.filter(|value| !value.is_empty());
        record.metadata.polity = row.polity.filter(|value| !value.is_empty());
        record
    }
}

/// Load a catalog file, choosing the format from its extension.
pub fn load_catalog(path: &Path) -> Result<Vec<StarRecord>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open catalog {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let stars = if is_json {
        catalog_from_json(file)
    } else {
        catalog_from_csv(file)
    }
    .with_context(|| format!("failed to read catalog {}", path.display()))?;

    info!(path = %path.display(), stars = stars.len(), "loaded star catalog");
    Ok(stars)
}

/// Parse CSV catalog rows.
pub fn catalog_from_csv<R: Read>(reader: R) -> Result<Vec<StarRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers: csv::StringRecord = csv_reader
        .headers()
        .context("failed to read catalog headers")?
        .iter()
        .map(|header| header.to_ascii_lowercase())
        .collect();
    for required in ["id", "name", "x", "y", "z"] {
        if !headers.iter().any(|header| header == required) {
            bail!("catalog is missing required column '{required}'");
        }
    }
    csv_reader.set_headers(headers);

    let mut stars = Vec::new();
    for (line, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Line numbers are 1-based and skip the header.
        let row = row.with_context(|| format!("invalid catalog row {}", line + 2))?;
        stars.push(StarRecord::from(row));
    }

    validate(&stars)?;
    debug!(rows = stars.len(), "parsed CSV catalog");
    Ok(stars)
}

/// Parse a JSON array of star records.
pub fn catalog_from_json<R: Read>(reader: R) -> Result<Vec<StarRecord>> {
    let stars: Vec<StarRecord> =
        serde_json::from_reader(reader).context("catalog is not a JSON array of stars")?;
    validate(&stars)?;
    Ok(stars)
}

fn validate(stars: &[StarRecord]) -> Result<()> {
    if let Some(star) = stars.iter().find(|star| !star.position.is_finite()) {
        bail!("star {} has non-finite coordinates", star.id);
    }
    if let Some(star) = stars.iter().find(|star| star.id.is_empty()) {
        bail!("star named '{}' has an empty identifier", star.name);
    }
    Ok(())
}
