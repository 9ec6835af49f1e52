use std::io::Write;

use comprel_core::{EstimateKind, Mode, ModeTriple};
use csv::StringRecord;

use crate::error::CatalogError;

/// Names of the three appended columns, e.g. `reliability_match`.
pub fn result_columns(kind: EstimateKind) -> [String; 3] {
    Mode::ALL.map(|mode| format!("{}_{}", kind, mode))
}

/// Undefined ratios are written as empty cells. Whole numbers keep a
/// trailing `.0` so the column reads as floating point.
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
    }
}

/// Write the input table with the result columns appended. Rows are padded
/// or cut to the header width so the result columns stay aligned.
pub(crate) fn write_results<W: Write>(
    output: W,
    headers: &StringRecord,
    records: &[StringRecord],
    kind: EstimateKind,
    results: &[ModeTriple],
) -> Result<(), CatalogError> {
    let mut writer = csv::Writer::from_writer(output);
    let width = headers.len();

    let mut header_row: Vec<String> = headers.iter().map(str::to_string).collect();
    header_row.extend(result_columns(kind));
    writer.write_record(&header_row)?;

    for (row_idx, (record, triple)) in records.iter().zip(results).enumerate() {
        if record.len() > width {
            tracing::warn!(
                row = row_idx,
                extra = record.len() - width,
                "Dropping cells beyond header width"
            );
        }
        let mut row: Vec<String> = (0..width)
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        row.extend(Mode::ALL.map(|mode| format_ratio(triple.get(mode))));
        writer.write_record(&row)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
