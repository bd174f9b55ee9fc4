//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for marketsim.
#[derive(Debug, thiserror::Error)]
pub enum MarketsimError {
    #[error("invalid date range: end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

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

    #[error("failed to parse {file}: {reason}")]
    InputParse { file: String, reason: String },

    #[error("forecast did not complete within {timeout_ms} ms")]
    ForecastTimeout { timeout_ms: u64 },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MarketsimError {
    pub fn unknown_symbol(symbol: &str) -> Self {
        MarketsimError::UnknownSymbol {
            symbol: symbol.to_string(),
        }
    }
}

impl From<&MarketsimError> for std::process::ExitCode {
    fn from(err: &MarketsimError) -> Self {
        let code: u8 = match err {
            MarketsimError::Io(_) | MarketsimError::Report { .. } => 1,
            MarketsimError::ConfigParse { .. }
            | MarketsimError::ConfigMissing { .. }
            | MarketsimError::ConfigInvalid { .. } => 2,
            MarketsimError::InputParse { .. } => 3,
            MarketsimError::InvalidRange { .. } | MarketsimError::InvalidSeries { .. } => 4,
            MarketsimError::UnknownSymbol { .. } => 5,
            MarketsimError::ForecastTimeout { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
