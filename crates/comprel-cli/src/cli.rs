//! Command-line interface.
//!
//! Single-star mode prints one ratio for the requested mode. Batch mode
//! evaluates every row of a CSV under all three modes and writes the table
//! back out with the result columns appended.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Parser;
use comprel_catalog::{load_catalog, run_batch_file};
use comprel_core::{EstimateKind, Mode, Query, Window, WindowDefaults};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;

/// Calculate reliability or completeness of a rotation-period measurement.
#[derive(Parser, Debug)]
#[command(name = "comprel")]
#[command(version)]
#[command(
    about = "Calculate reliability or completeness from the reference catalog",
    long_about = "Calculate reliability or completeness of a TESS rotation-period measurement \
                  against a catalog of stars with known periods.\n\nExample usage:\n  \
                  comprel reliability --input-period 9 --ls 0.1\n  \
                  comprel completeness --batch-file stars.csv"
)]
pub struct Cli {
    /// Which calculation to perform.
    #[arg(value_parser = PossibleValuesParser::new(["reliability", "completeness"])
        .try_map(|s| s.parse::<EstimateKind>()))]
    pub function: EstimateKind,

    /// Measured rotation period of the star in days (single-star mode).
    #[arg(long)]
    pub input_period: Option<f64>,

    /// Lomb-Scargle power (must be between 0 and 1).
    #[arg(long)]
    pub ls: Option<f64>,

    /// TESS magnitude.
    #[arg(long, allow_negative_numbers = true)]
    pub t: Option<f64>,

    /// Signal-to-noise ratio (must be greater than 0).
    #[arg(long)]
    pub snr: Option<f64>,

    /// Lower bound for the period window.
    #[arg(long, default_value_t = 1.0)]
    pub period_lower_limit: f64,

    /// Upper bound for the period window.
    #[arg(long, default_value_t = 1.0)]
    pub period_upper_limit: f64,

    /// Lower bound for the Lomb-Scargle power window.
    #[arg(long, default_value_t = 0.05)]
    pub ls_lower_limit: f64,

    /// Upper bound for the Lomb-Scargle power window.
    #[arg(long, default_value_t = 0.05)]
    pub ls_upper_limit: f64,

    /// Lower bound for the TESS magnitude window.
    #[arg(long, default_value_t = 0.5)]
    pub t_lower_limit: f64,

    /// Upper bound for the TESS magnitude window.
    #[arg(long, default_value_t = 0.5)]
    pub t_upper_limit: f64,

    /// Lower bound for the SNR window.
    #[arg(long, default_value_t = 2.5)]
    pub snr_lower_limit: f64,

    /// Upper bound for the SNR window.
    #[arg(long, default_value_t = 2.5)]
    pub snr_upper_limit: f64,

    /// Status category to count (single-star mode).
    #[arg(
        long,
        default_value = "match",
        value_parser = PossibleValuesParser::new(["match", "alias", "recovery"])
            .try_map(|s| s.parse::<Mode>())
    )]
    pub mode: Mode,

    /// CSV with one star per row. The first column is the star name and an
    /// `input_period` column is required; `ls`, `t`, `snr` and their
    /// `<param>_lower_limit` / `<param>_upper_limit` columns are optional.
    #[arg(long)]
    pub batch_file: Option<PathBuf>,

    /// Batch output path. Defaults to `<batch stem>_output.csv`.
    #[arg(short, long, requires = "batch_file")]
    pub output: Option<PathBuf>,

    /// Reference catalog CSV. Overrides COMPREL_CATALOG.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print the single-star result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn window_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            period: Window::new(self.period_lower_limit, self.period_upper_limit),
            power: Window::new(self.ls_lower_limit, self.ls_upper_limit),
            magnitude: Window::new(self.t_lower_limit, self.t_upper_limit),
            snr: Window::new(self.snr_lower_limit, self.snr_upper_limit),
        }
    }

    /// Single-star query from the flags. Validation happens in the estimator.
    pub fn single_query(&self) -> Result<Query> {
        let input_period = self.input_period.context(
            "You must provide --input-period or use --batch-file. \
             No batch file supplied, so single-star mode expects an input period.",
        )?;
        let windows = self.window_defaults();

        let mut query = Query::new(input_period, self.mode).with_period_window(windows.period);
        if let Some(ls) = self.ls {
            query = query.with_power(ls, windows.power);
        }
        if let Some(t) = self.t {
            query = query.with_magnitude(t, windows.magnitude);
        }
        if let Some(snr) = self.snr {
            query = query.with_snr(snr, windows.snr);
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
struct SingleStarReport<'a> {
    function: EstimateKind,
    mode: Mode,
    value: Option<f64>,
    query: &'a Query,
}

fn describe(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| v.to_string())
}

pub fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    run_with_writer(&cli, config, &mut std::io::stdout().lock())
}

/// Same as [`run`], with user-facing output sent to `out`.
pub fn run_with_writer<W: Write>(cli: &Cli, config: &AppConfig, out: &mut W) -> Result<()> {
    let kind = cli.function;
    let catalog_path = cli.catalog.clone().unwrap_or_else(|| config.catalog_path.clone());
    let catalog = load_catalog(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

    if let Some(batch_file) = &cli.batch_file {
        info!(batch = %batch_file.display(), function = %kind, "Batch mode");
        let (output, summary) = run_batch_file(
            &catalog,
            kind,
            batch_file,
            cli.output.as_deref(),
            &cli.window_defaults(),
        )
        .with_context(|| format!("Batch run failed for {}", batch_file.display()))?;

        writeln!(out, "[Batch Mode] Wrote {} results to {}", kind, output.display())?;
        if summary.failed > 0 {
            writeln!(out, "[Batch Mode] {} of {} rows skipped", summary.failed, summary.rows)?;
        }
        return Ok(());
    }

    let query = cli.single_query()?;
    let value = kind.estimator().estimate(&catalog, &query)?;

    if cli.json {
        let report = SingleStarReport {
            function: kind,
            mode: query.mode,
            value,
            query: &query,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "Calculated {} ({}): {}", kind, query.mode, describe(value))?;
    }
    Ok(())
}
