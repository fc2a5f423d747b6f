//! Domain error types.

use chrono::NaiveDate;

use crate::domain::indicator::IndicatorKind;

/// Top-level error type for tradebot.
#[derive(Debug, thiserror::Error)]
pub enum TradebotError {
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

    #[error("{indicator}: invalid duration {duration} (must be greater than 1)")]
    InvalidDuration {
        indicator: IndicatorKind,
        duration: usize,
    },

    #[error("{strategy}: indicator {indicator} is not available")]
    MissingIndicator {
        strategy: String,
        indicator: IndicatorKind,
    },

    #[error("{strategy}: {indicator} needs {required} records but the window holds {window}")]
    WindowTooShort {
        strategy: String,
        indicator: IndicatorKind,
        required: usize,
        window: usize,
    },

    #[error("rate {value} out of range [0, 100]")]
    RateOutOfRange { value: f64 },

    #[error("cannot {operation} a negative amount ({amount})")]
    NegativeAmount { operation: &'static str, amount: f64 },

    #[error("cannot {operation} before a price is known")]
    PriceUnavailable { operation: &'static str },

    #[error("corrupted record {date}: {reason}")]
    CorruptRecord { date: String, reason: String },

    #[error("duplicate record date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no records to process")]
    NoData,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradebotError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TradebotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(section: &str, key: &str) -> Self {
        TradebotError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&TradebotError> for std::process::ExitCode {
    fn from(err: &TradebotError) -> Self {
        let code: u8 = match err {
            TradebotError::Io(_) => 1,
            TradebotError::ConfigParse { .. }
            | TradebotError::ConfigMissing { .. }
            | TradebotError::ConfigInvalid { .. }
            | TradebotError::InvalidDuration { .. }
            | TradebotError::MissingIndicator { .. }
            | TradebotError::WindowTooShort { .. } => 2,
            TradebotError::CorruptRecord { .. }
            | TradebotError::DuplicateDate { .. }
            | TradebotError::Data { .. } => 3,
            TradebotError::RateOutOfRange { .. }
            | TradebotError::NegativeAmount { .. }
            | TradebotError::PriceUnavailable { .. } => 4,
            TradebotError::NoData => 5,
        };
        std::process::ExitCode::from(code)
    }
}
