//! Reliability and completeness estimators.
//!
//! Reliability divides by the full box (period and auxiliary axes);
//! completeness divides by the period-only box and counts matches after the
//! auxiliary axes are applied to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::box_filter::BoxFilter;
use crate::classifier::StatusClassifier;
use crate::error::QueryError;
use crate::types::{Catalog, Mode, Query};

/// Boxes with fewer rows than this produce no estimate.
pub const MIN_BOX_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateKind {
    Reliability,
    Completeness,
}

impl EstimateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateKind::Reliability => "reliability",
            EstimateKind::Completeness => "completeness",
        }
    }

    pub fn estimator(self) -> &'static dyn Estimator {
        match self {
            EstimateKind::Reliability => &ReliabilityEstimator,
            EstimateKind::Completeness => &CompletenessEstimator,
        }
    }
}

impl FromStr for EstimateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reliability" => Ok(EstimateKind::Reliability),
            "completeness" => Ok(EstimateKind::Completeness),
            other => Err(format!(
                "unknown function '{other}': expected 'reliability' or 'completeness'"
            )),
        }
    }
}

impl fmt::Display for EstimateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A box statistic over the reference catalog
pub trait Estimator: Send + Sync {
    fn kind(&self) -> EstimateKind;

    /// `Ok(None)` when the denominator population is below [`MIN_BOX_SIZE`].
    fn estimate(&self, catalog: &Catalog, query: &Query) -> Result<Option<f64>, QueryError>;
}

/// Fraction of the full box whose status matches the mode
#[derive(Debug, Clone, Copy, Default)]
pub struct ReliabilityEstimator;

impl Estimator for ReliabilityEstimator {
    fn kind(&self) -> EstimateKind {
        EstimateKind::Reliability
    }

    fn estimate(&self, catalog: &Catalog, query: &Query) -> Result<Option<f64>, QueryError> {
        query.validate()?;

        let boxed = BoxFilter::full(query).apply(catalog);
        if boxed.len() < MIN_BOX_SIZE {
            tracing::debug!(
                period = query.input_period,
                boxed = boxed.len(),
                "Too few catalog stars in box for reliability"
            );
            return Ok(None);
        }

        let matched = StatusClassifier::new(query.mode).count(boxed.iter().copied());
        Ok(Some(ratio(matched, boxed.len())))
    }
}

/// Fraction of the period-only box that survives the auxiliary axes with a
/// matching status
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessEstimator;

impl Estimator for CompletenessEstimator {
    fn kind(&self) -> EstimateKind {
        EstimateKind::Completeness
    }

    fn estimate(&self, catalog: &Catalog, query: &Query) -> Result<Option<f64>, QueryError> {
        query.validate()?;

        let all_in_period = BoxFilter::period(query).apply(catalog);
        if all_in_period.len() < MIN_BOX_SIZE {
            tracing::debug!(
                period = query.input_period,
                in_period = all_in_period.len(),
                "Too few catalog stars in period window for completeness"
            );
            return Ok(None);
        }

        let boxed = BoxFilter::auxiliary(query).apply(all_in_period.iter().copied());
        let matched = StatusClassifier::new(query.mode).count(boxed);
        Ok(Some(ratio(matched, all_in_period.len())))
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

pub fn reliability(catalog: &Catalog, query: &Query) -> Result<Option<f64>, QueryError> {
    ReliabilityEstimator.estimate(catalog, query)
}

pub fn completeness(catalog: &Catalog, query: &Query) -> Result<Option<f64>, QueryError> {
    CompletenessEstimator.estimate(catalog, query)
}

/// One estimate per [`Mode`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeTriple {
    #[serde(rename = "match")]
    pub matched: Option<f64>,
    pub alias: Option<f64>,
    pub recovery: Option<f64>,
}

impl ModeTriple {
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: Mode) -> Option<f64> {
        match mode {
            Mode::Match => self.matched,
            Mode::Alias => self.alias,
            Mode::Recovery => self.recovery,
        }
    }

    pub fn is_undefined(&self) -> bool {
        Mode::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Evaluate `template` under every mode; its own `mode` is ignored.
pub fn estimate_all_modes(
    estimator: &dyn Estimator,
    catalog: &Catalog,
    template: &Query,
) -> Result<ModeTriple, QueryError> {
    let mut triple = ModeTriple::undefined();
    for mode in Mode::ALL {
        let value = estimator.estimate(catalog, &template.clone().with_mode(mode))?;
        match mode {
            Mode::Match => triple.matched = value,
            Mode::Alias => triple.alias = value,
            Mode::Recovery => triple.recovery = value,
        }
    }
    Ok(triple)
}
