use thiserror::Error;

/// Validation failures raised before any filtering runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid input_period {0}: the rotation period must be between 0.2 and 20 days")]
    InvalidPeriod(f64),

    #[error("No auxiliary parameter: specify a value for at least one of ls, t, snr")]
    NoAuxiliaryParameter,

    #[error("Invalid mode '{0}': must be one of 'match', 'alias', or 'recovery'")]
    InvalidMode(String),

    #[error("Invalid ls {0}: Lomb-Scargle power must be between 0 and 1")]
    InvalidPower(f64),

    #[error("Invalid snr {0}: SNR must be greater than 0")]
    InvalidSnr(f64),

    #[error("Invalid {axis} window ({lower}, {upper}): limits must be finite and non-negative")]
    InvalidWindow {
        axis: &'static str,
        lower: f64,
        upper: f64,
    },
}

impl QueryError {
    /// Name of the query field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            QueryError::InvalidPeriod(_) => "input_period",
            QueryError::NoAuxiliaryParameter => "ls/t/snr",
            QueryError::InvalidMode(_) => "mode",
            QueryError::InvalidPower(_) => "ls",
            QueryError::InvalidSnr(_) => "snr",
            QueryError::InvalidWindow { axis, .. } => axis,
        }
    }
}
