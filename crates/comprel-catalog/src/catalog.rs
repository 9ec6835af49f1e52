//! Reference catalog loading.
//!
//! Expected columns: prot_rh20, status, and optionally power, Tmag, snr.
//! Any other columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use comprel_core::{Catalog, CatalogRow, Status};
use csv::StringRecord;

use crate::error::CatalogError;

/// Catalog shipped alongside the tool
pub const DEFAULT_CATALOG_PATH: &str = "final_comp_rel_df.csv";

const TRUE_PERIOD_COLUMN: &str = "prot_rh20";
const POWER_COLUMN: &str = "power";
const MAGNITUDE_COLUMN: &str = "Tmag";
const SNR_COLUMN: &str = "snr";
const STATUS_COLUMN: &str = "status";

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = read_catalog(file)?;
    tracing::info!(
        path = %path.display(),
        rows = catalog.len(),
        "Loaded reference catalog"
    );
    Ok(catalog)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let true_period = require_column(&headers, TRUE_PERIOD_COLUMN)?;
    let status = require_column(&headers, STATUS_COLUMN)?;
    let power = find_column(&headers, POWER_COLUMN);
    let magnitude = find_column(&headers, MAGNITUDE_COLUMN);
    let snr = find_column(&headers, SNR_COLUMN);

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let optional = |idx: Option<usize>, column: &str| -> Result<Option<f64>, CatalogError> {
            match idx {
                Some(i) => parse_cell(&record, i, row, column),
                None => Ok(None),
            }
        };

        rows.push(CatalogRow {
            true_period: parse_cell(&record, true_period, row, TRUE_PERIOD_COLUMN)?
                .unwrap_or(f64::NAN),
            power: optional(power, POWER_COLUMN)?,
            magnitude: optional(magnitude, MAGNITUDE_COLUMN)?,
            snr: optional(snr, SNR_COLUMN)?,
            status: Status::from(record.get(status).unwrap_or("")),
        });
    }

    Ok(Catalog::new(rows))
}

pub(crate) fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

pub(crate) fn require_column(headers: &StringRecord, name: &str) -> Result<usize, CatalogError> {
    find_column(headers, name).ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
}

/// Blank and NaN cells read as absent.
pub(crate) fn parse_cell(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<Option<f64>, CatalogError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(CatalogError::InvalidValue {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}
