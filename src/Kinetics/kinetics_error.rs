use thiserror::Error;

/// error types for kinetics evaluation, sweeps and output
#[derive(Debug, Error)]
pub enum KinError {
    #[error("target fraction must lie strictly between 0 and 1, got {0}")]
    FractionOutOfRange(f64),
    #[error("parameter '{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("parameter '{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("parameter '{name}' = {value} is outside the allowed range {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
    #[error("requirement unreachable: {0}")]
    Unreachable(String),
    #[error("invalid axis '{axis}': {reason}")]
    InvalidAxis { axis: String, reason: String },
    #[error("unknown column or axis '{0}'")]
    UnknownColumn(String),
    #[error("evaluation failed at [{combination}]: {source}")]
    Evaluation {
        combination: String,
        #[source]
        source: Box<KinError>,
    },
    #[error("evaluation at [{combination}] returned {got} values, expected {expected}")]
    ShapeMismatch {
        combination: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("output directory {0} does not exist")]
    MissingOutputDir(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("settings file error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plot error in {file}: {message}")]
    Plot { file: String, message: String },
}

/// Rejects NaN and infinities
pub fn check_finite(name: &'static str, value: f64) -> Result<f64, KinError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KinError::NonFinite { name, value })
    }
}

/// Rejects zero, negative and non-finite values
pub fn check_positive(name: &'static str, value: f64) -> Result<f64, KinError> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(KinError::NonPositive { name, value })
    }
}
