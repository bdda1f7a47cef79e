//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for frontier.
#[derive(Debug, thiserror::Error)]
pub enum FrontierError {
    #[error("insufficient data: have {observations} return observations, need {minimum}")]
    InsufficientData { observations: usize, minimum: usize },

    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no valid portfolio: {reason}")]
    NoValidPortfolio { reason: String },

    #[error("search cancelled after {completed} samples")]
    Cancelled { completed: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrontierError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            FrontierError::Io(_) | FrontierError::Report { .. } => 1,
            FrontierError::ConfigParse { .. }
            | FrontierError::ConfigMissing { .. }
            | FrontierError::ConfigInvalid { .. }
            | FrontierError::Universe(_) => 2,
            FrontierError::Data { .. } | FrontierError::NoData { .. } => 3,
            FrontierError::InsufficientData { .. } => 5,
            FrontierError::DimensionMismatch { .. }
            | FrontierError::NoValidPortfolio { .. }
            | FrontierError::Cancelled { .. } => 6,
        }
    }
}

impl From<&FrontierError> for std::process::ExitCode {
    fn from(err: &FrontierError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
