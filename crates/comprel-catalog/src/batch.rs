//! Batch evaluation of many stars from a CSV file.
//!
//! The first column holds the star name and an `input_period` column is
//! required. Auxiliary values live in `ls`, `t` and `snr` columns. Their
//! limits are read from `<param>_lower_limit` / `<param>_upper_limit` when
//! present; otherwise the two columns directly after the value are used if
//! their names contain "lim". Blank limits fall back to the defaults.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use comprel_core::{
    estimate_all_modes, Axis, AuxiliaryValue, Catalog, EstimateKind, Mode, ModeTriple, Query,
    Window, WindowDefaults,
};
use csv::{ByteRecord, StringRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{find_column, parse_cell, require_column};
use crate::error::CatalogError;
use crate::output::write_results;

const INPUT_PERIOD_COLUMN: &str = "input_period";
const AUXILIARY_AXES: [Axis; 3] = [Axis::Power, Axis::Magnitude, Axis::Snr];

/// Column indices holding a parameter's lower and upper limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitColumns {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamColumns {
    pub value: usize,
    pub limits: LimitColumns,
}

/// Resolved layout of a batch file
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSchema {
    headers: StringRecord,
    input_period: usize,
    power: Option<ParamColumns>,
    magnitude: Option<ParamColumns>,
    snr: Option<ParamColumns>,
}

impl BatchSchema {
    pub fn resolve(headers: &StringRecord) -> Result<Self, CatalogError> {
        if headers.len() < 2 {
            return Err(CatalogError::TooFewColumns(headers.len()));
        }
        let input_period = require_column(headers, INPUT_PERIOD_COLUMN)?;

        let mut schema = Self {
            headers: headers.clone(),
            input_period,
            power: None,
            magnitude: None,
            snr: None,
        };
        for axis in AUXILIARY_AXES {
            let columns = resolve_param(headers, axis);
            match axis {
                Axis::Power => schema.power = columns,
                Axis::Magnitude => schema.magnitude = columns,
                Axis::Snr => schema.snr = columns,
                Axis::Period => {}
            }
        }
        Ok(schema)
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn param(&self, axis: Axis) -> Option<ParamColumns> {
        match axis {
            Axis::Power => self.power,
            Axis::Magnitude => self.magnitude,
            Axis::Snr => self.snr,
            Axis::Period => None,
        }
    }

    fn column_name(&self, idx: usize) -> &str {
        self.headers.get(idx).unwrap_or("")
    }

    /// Star name from the first column.
    pub fn star_name<'r>(&self, record: &'r StringRecord) -> &'r str {
        record.get(0).unwrap_or("").trim()
    }

    /// Build the query template for one row; its mode is a placeholder.
    pub fn query_for(
        &self,
        record: &StringRecord,
        row: usize,
        defaults: &WindowDefaults,
    ) -> Result<Query, CatalogError> {
        let input_period = parse_cell(record, self.input_period, row, INPUT_PERIOD_COLUMN)?
            .ok_or_else(|| CatalogError::MissingValue {
                row,
                column: INPUT_PERIOD_COLUMN.to_string(),
            })?;

        let mut query = Query::new(input_period, Mode::Match).with_period_window(defaults.period);
        for axis in AUXILIARY_AXES {
            let aux = match self.param(axis) {
                Some(columns) => self.auxiliary_value(record, row, columns, defaults.for_axis(axis))?,
                None => None,
            };
            match axis {
                Axis::Power => query.power = aux,
                Axis::Magnitude => query.magnitude = aux,
                Axis::Snr => query.snr = aux,
                Axis::Period => {}
            }
        }
        Ok(query)
    }

    fn auxiliary_value(
        &self,
        record: &StringRecord,
        row: usize,
        columns: ParamColumns,
        default: Window,
    ) -> Result<Option<AuxiliaryValue>, CatalogError> {
        let Some(value) = parse_cell(record, columns.value, row, self.column_name(columns.value))?
        else {
            return Ok(None);
        };

        let limit = |idx: Option<usize>, fallback: f64| -> Result<f64, CatalogError> {
            match idx {
                Some(i) => Ok(parse_cell(record, i, row, self.column_name(i))?.unwrap_or(fallback)),
                None => Ok(fallback),
            }
        };
        let window = Window::new(
            limit(columns.limits.lower, default.lower)?,
            limit(columns.limits.upper, default.upper)?,
        );
        Ok(Some(AuxiliaryValue::new(value, window)))
    }
}

fn is_explicit_limit(name: &str) -> bool {
    AUXILIARY_AXES.iter().any(|axis| {
        name == format!("{}_lower_limit", axis.name()) || name == format!("{}_upper_limit", axis.name())
    })
}

fn resolve_param(headers: &StringRecord, axis: Axis) -> Option<ParamColumns> {
    let name = axis.name();
    let value = find_column(headers, name)?;

    let mut limits = LimitColumns {
        lower: find_column(headers, &format!("{name}_lower_limit")),
        upper: find_column(headers, &format!("{name}_upper_limit")),
    };

    // Positional fallback for files written before the named-limit layout
    let positional = |offset: usize| -> Option<usize> {
        let idx = value + offset;
        let header = headers.get(idx)?;
        let lowered = header.to_lowercase();
        (lowered.contains("lim") && !is_explicit_limit(header)).then_some(idx)
    };
    if limits.lower.is_none() {
        limits.lower = positional(1);
    }
    if limits.upper.is_none() {
        limits.upper = positional(2);
    }

    Some(ParamColumns { value, limits })
}

/// Counts reported after a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub evaluated: usize,
    /// Rows that failed to parse or validate
    pub failed: usize,
    /// Evaluated rows where every mode came back undefined
    pub undefined: usize,
}

fn evaluate_row(
    catalog: &Catalog,
    kind: EstimateKind,
    schema: &BatchSchema,
    record: &StringRecord,
    row: usize,
    defaults: &WindowDefaults,
) -> Result<ModeTriple, CatalogError> {
    let template = schema.query_for(record, row, defaults)?;
    Ok(estimate_all_modes(kind.estimator(), catalog, &template)?)
}

/// Rows that are not valid UTF-8 are kept with replacement characters so
/// they can still be written back out; the flag marks them as failed.
fn decode_record(raw: ByteRecord) -> (StringRecord, bool) {
    match StringRecord::from_byte_record(raw) {
        Ok(record) => (record, true),
        Err(e) => {
            let lossy = e
                .into_byte_record()
                .iter()
                .map(String::from_utf8_lossy)
                .collect::<StringRecord>();
            (lossy, false)
        }
    }
}

/// Evaluate every row of `input` and write the augmented table to `output`.
pub fn run_batch<R: Read, W: Write>(
    catalog: &Catalog,
    kind: EstimateKind,
    input: R,
    output: W,
    defaults: &WindowDefaults,
) -> Result<BatchSummary, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let schema = BatchSchema::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    let mut valid_utf8 = Vec::new();
    for result in reader.byte_records() {
        let (record, valid) = decode_record(result?);
        records.push(record);
        valid_utf8.push(valid);
    }

    tracing::debug!(rows = records.len(), function = %kind, "Evaluating batch");

    let outcomes: Vec<Option<ModeTriple>> = records
        .par_iter()
        .enumerate()
        .map(|(row, record)| {
            let outcome = if valid_utf8[row] {
                evaluate_row(catalog, kind, &schema, record, row, defaults)
            } else {
                Err(CatalogError::InvalidEncoding { row })
            };
            match outcome {
                Ok(triple) => Some(triple),
                Err(e) => {
                    tracing::warn!(
                        row,
                        star = schema.star_name(record),
                        error = %e,
                        "Skipping row"
                    );
                    None
                }
            }
        })
        .collect();

    let mut summary = BatchSummary {
        rows: records.len(),
        ..Default::default()
    };
    for outcome in &outcomes {
        match outcome {
            Some(triple) => {
                summary.evaluated += 1;
                if triple.is_undefined() {
                    summary.undefined += 1;
                }
            }
            None => summary.failed += 1,
        }
    }

    let results: Vec<ModeTriple> = outcomes.into_iter().map(Option::unwrap_or_default).collect();
    write_results(output, schema.headers(), &records, kind, &results)?;

    Ok(summary)
}

/// `<stem>_output.csv` in the working directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "batch".to_string());
    PathBuf::from(format!("{stem}_output.csv"))
}

/// File-based wrapper around [`run_batch`]. Returns the path written.
pub fn run_batch_file(
    catalog: &Catalog,
    kind: EstimateKind,
    input: &Path,
    output: Option<&Path>,
    defaults: &WindowDefaults,
) -> Result<(PathBuf, BatchSummary), CatalogError> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let reader = File::open(input).map_err(|source| CatalogError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = File::create(&output).map_err(|source| CatalogError::Io {
        path: output.clone(),
        source,
    })?;

    let summary = run_batch(catalog, kind, reader, writer, defaults)?;
    tracing::info!(
        output = %output.display(),
        rows = summary.rows,
        failed = summary.failed,
        undefined = summary.undefined,
        "Wrote {} results",
        kind
    );
    Ok((output, summary))
}
