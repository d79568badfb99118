//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum CrossoverError {
    #[error("no price data for {ticker} between {start_date} and {end_date}")]
    DataUnavailable {
        ticker: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("price data source error: {reason}")]
    DataSource { reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidRange { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing required input `{key}` (pass --{key} or set [{section}] {key})")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrossoverError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CrossoverError::InvalidRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&CrossoverError> for std::process::ExitCode {
    fn from(err: &CrossoverError) -> Self {
        let code: u8 = match err {
            CrossoverError::Io(_) | CrossoverError::Report { .. } => 1,
            CrossoverError::InvalidRange { .. }
            | CrossoverError::ConfigParse { .. }
            | CrossoverError::ConfigMissing { .. }
            | CrossoverError::ConfigInvalid { .. } => 2,
            CrossoverError::DataSource { .. } => 3,
            CrossoverError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

/// Conditions that do not abort a run but are reported alongside its output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunWarning {
    /// The range has fewer than `long_window + 1` priced days. The signal reads
    /// the previous day's price, so the long average is never defined and the
    /// signal stays flat throughout.
    #[error(
        "insufficient history: {business_days} business days in range, long window of {long_window} needs more than {long_window}; signal stays flat"
    )]
    InsufficientHistory {
        business_days: usize,
        long_window: usize,
    },
}
