use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::box_filter::Axis;
use crate::error::QueryError;

/// Exclusive lower bound on the measured rotation period (days)
pub const MIN_INPUT_PERIOD: f64 = 0.2;
/// Exclusive upper bound on the measured rotation period (days)
pub const MAX_INPUT_PERIOD: f64 = 20.0;

/// Outcome of a TESS measurement relative to the true rotation period
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Measured period matches the true period
    Match,
    /// Measured period is a harmonic of the true period
    Alias,
    /// No usable period was recovered
    NotRecovered,
    /// Any other recorded label, kept verbatim
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Match => "match",
            Status::Alias => "alias",
            Status::NotRecovered => "not_recovered",
            Status::Other(label) => label,
        }
    }
}

impl From<&str> for Status {
    fn from(label: &str) -> Self {
        match label {
            "match" => Status::Match,
            "alias" => Status::Alias,
            "not_recovered" => Status::NotRecovered,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Status::from(label.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which status category a ratio counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Match,
    Alias,
    /// Anything other than `not_recovered`
    Recovery,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Match, Mode::Alias, Mode::Recovery];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Match => "match",
            Mode::Alias => "alias",
            Mode::Recovery => "recovery",
        }
    }
}

impl FromStr for Mode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(Mode::Match),
            "alias" => Ok(Mode::Alias),
            "recovery" => Ok(Mode::Recovery),
            _ => Err(QueryError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open interval `(center - lower, center + upper)` around a query value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub lower: f64,
    pub upper: f64,
}

impl Window {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub const fn symmetric(half_width: f64) -> Self {
        Self::new(half_width, half_width)
    }

    /// Both bounds are exclusive. NaN values never fall inside.
    pub fn contains(&self, center: f64, value: f64) -> bool {
        value > center - self.lower && value < center + self.upper
    }

    fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower >= 0.0 && self.upper >= 0.0
    }
}

/// Default half-widths applied when a caller supplies a value without limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowDefaults {
    pub period: Window,
    pub power: Window,
    pub magnitude: Window,
    pub snr: Window,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            period: Window::symmetric(1.0),
            power: Window::symmetric(0.05),
            magnitude: Window::symmetric(0.5),
            snr: Window::symmetric(2.5),
        }
    }
}

impl WindowDefaults {
    pub fn for_axis(&self, axis: Axis) -> Window {
        match axis {
            Axis::Period => self.period,
            Axis::Power => self.power,
            Axis::Magnitude => self.magnitude,
            Axis::Snr => self.snr,
        }
    }
}

/// One star of the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    /// Ground-truth rotation period in days
    pub true_period: f64,
    /// Measured Lomb-Scargle power
    pub power: Option<f64>,
    /// TESS magnitude
    pub magnitude: Option<f64>,
    /// Signal-to-noise ratio of the measurement
    pub snr: Option<f64>,
    pub status: Status,
}

/// Read-only reference catalog, loaded once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<CatalogRow> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogRow;
    type IntoIter = std::slice::Iter<'a, CatalogRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// An auxiliary observable and the window drawn around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryValue {
    pub value: f64,
    pub window: Window,
}

impl AuxiliaryValue {
    pub fn new(value: f64, window: Window) -> Self {
        Self { value, window }
    }
}

/// A single reliability or completeness lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Measured rotation period in days
    pub input_period: f64,
    pub period_window: Window,
    /// Lomb-Scargle power (`ls`)
    pub power: Option<AuxiliaryValue>,
    /// TESS magnitude (`t`)
    pub magnitude: Option<AuxiliaryValue>,
    pub snr: Option<AuxiliaryValue>,
    pub mode: Mode,
}

impl Query {
    /// Query with the default +/- 1 day period window and no auxiliary axes.
    pub fn new(input_period: f64, mode: Mode) -> Self {
        Self {
            input_period,
            period_window: WindowDefaults::default().period,
            power: None,
            magnitude: None,
            snr: None,
            mode,
        }
    }

    pub fn with_period_window(mut self, window: Window) -> Self {
        self.period_window = window;
        self
    }

    pub fn with_power(mut self, value: f64, window: Window) -> Self {
        self.power = Some(AuxiliaryValue::new(value, window));
        self
    }

    pub fn with_magnitude(mut self, value: f64, window: Window) -> Self {
        self.magnitude = Some(AuxiliaryValue::new(value, window));
        self
    }

    pub fn with_snr(mut self, value: f64, window: Window) -> Self {
        self.snr = Some(AuxiliaryValue::new(value, window));
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Auxiliary axes that were supplied, in application order.
    pub fn auxiliary(&self) -> impl Iterator<Item = (Axis, AuxiliaryValue)> + '_ {
        [
            (Axis::Power, self.power),
            (Axis::Magnitude, self.magnitude),
            (Axis::Snr, self.snr),
        ]
        .into_iter()
        .filter_map(|(axis, aux)| aux.map(|a| (axis, a)))
    }

    /// Check every precondition. Must pass before any filtering.
    pub fn validate(&self) -> Result<(), QueryError> {
        let p = self.input_period;
        if !(p > MIN_INPUT_PERIOD && p < MAX_INPUT_PERIOD) {
            return Err(QueryError::InvalidPeriod(p));
        }

        if self.power.is_none() && self.magnitude.is_none() && self.snr.is_none() {
            return Err(QueryError::NoAuxiliaryParameter);
        }

        if let Some(power) = self.power {
            if !(power.value > 0.0 && power.value < 1.0) {
                return Err(QueryError::InvalidPower(power.value));
            }
        }

        if let Some(snr) = self.snr {
            if snr.value.is_nan() || snr.value <= 0.0 {
                return Err(QueryError::InvalidSnr(snr.value));
            }
        }

        let windows = std::iter::once((Axis::Period, self.period_window))
            .chain(self.auxiliary().map(|(axis, aux)| (axis, aux.window)));
        for (axis, window) in windows {
            if !window.is_valid() {
                return Err(QueryError::InvalidWindow {
                    axis: axis.name(),
                    lower: window.lower,
                    upper: window.upper,
                });
            }
        }

        Ok(())
    }
}
