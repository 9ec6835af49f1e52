//! Reliability and completeness of rotation-period measurements.
//!
//! A measured period plus one or more auxiliary observables (Lomb-Scargle
//! power, TESS magnitude, SNR) defines a box in parameter space. The box is
//! intersected with a reference catalog of stars whose true periods are known,
//! and the fraction of recovered measurements inside it is reported.

pub mod box_filter;
pub mod classifier;
pub mod error;
pub mod estimator;
pub mod types;
#[cfg(test)]
mod tests;

pub use box_filter::{Axis, AxisBound, BoxFilter};
pub use classifier::StatusClassifier;
pub use error::*;
pub use estimator::{
    completeness, estimate_all_modes, reliability, CompletenessEstimator, EstimateKind, Estimator,
    ModeTriple, ReliabilityEstimator, MIN_BOX_SIZE,
};
pub use types::*;
