//! Streaming technical indicators.
//!
//! Each indicator owns a [`RollingWindow`] of the most recent records and is
//! updated once per step by the simulation loop. Queries are pure:
//! - `Ok(None)` means not enough records are buffered yet
//! - `Err(InvalidDuration)` means the query itself is malformed
//!
//! [`IndicatorKind`] is the tag strategies use to declare what they read;
//! [`bank::IndicatorBank`] maps tags to live instances.

pub mod bank;
pub mod feature_view;
pub mod last_record;
pub mod roc;
pub mod rsi;
pub mod trend;
pub mod window;

use std::fmt;
use std::str::FromStr;

use crate::domain::error::TradebotError;
use crate::domain::record::PriceRecord;

pub use bank::{IndicatorBank, MAX_WINDOW, MIN_WINDOW};
pub use feature_view::FeatureView;
pub use last_record::LastRecord;
pub use roc::Roc;
pub use rsi::Rsi;
pub use trend::{Trend, TrendDirection};
pub use window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorKind {
    Rsi,
    Trend,
    Roc,
    LastRecord,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Rsi,
        IndicatorKind::Trend,
        IndicatorKind::Roc,
        IndicatorKind::LastRecord,
    ];

    /// Number of buffered records needed before a query at `duration` yields a value.
    pub fn records_required(self, duration: usize) -> usize {
        match self {
            IndicatorKind::Rsi => duration,
            IndicatorKind::Trend | IndicatorKind::Roc => duration.saturating_add(1),
            IndicatorKind::LastRecord => 1,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Rsi => write!(f, "RSI"),
            IndicatorKind::Trend => write!(f, "TREND"),
            IndicatorKind::Roc => write!(f, "ROC"),
            IndicatorKind::LastRecord => write!(f, "LAST_RECORD"),
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" => Ok(IndicatorKind::Rsi),
            "trend" => Ok(IndicatorKind::Trend),
            "roc" => Ok(IndicatorKind::Roc),
            "last_record" | "last" => Ok(IndicatorKind::LastRecord),
            other => Err(format!("unknown indicator '{other}'")),
        }
    }
}

/// Shared guard for duration-parameterized queries.
pub(crate) fn check_duration(kind: IndicatorKind, duration: usize) -> Result<(), TradebotError> {
    if duration <= 1 {
        return Err(TradebotError::InvalidDuration {
            indicator: kind,
            duration,
        });
    }
    Ok(())
}

/// A live indicator instance, one variant per [`IndicatorKind`].
#[derive(Debug, Clone)]
pub enum Indicator {
    Rsi(Rsi),
    Trend(Trend),
    Roc(Roc),
    LastRecord(LastRecord),
}

impl Indicator {
    pub fn new(kind: IndicatorKind, max_duration: usize) -> Self {
        match kind {
            IndicatorKind::Rsi => Indicator::Rsi(Rsi::new(max_duration)),
            IndicatorKind::Trend => Indicator::Trend(Trend::new(max_duration)),
            IndicatorKind::Roc => Indicator::Roc(Roc::new(max_duration)),
            IndicatorKind::LastRecord => Indicator::LastRecord(LastRecord::default()),
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            Indicator::Rsi(_) => IndicatorKind::Rsi,
            Indicator::Trend(_) => IndicatorKind::Trend,
            Indicator::Roc(_) => IndicatorKind::Roc,
            Indicator::LastRecord(_) => IndicatorKind::LastRecord,
        }
    }

    pub fn update(&mut self, record: &PriceRecord) {
        match self {
            Indicator::Rsi(rsi) => rsi.update(record),
            Indicator::Trend(trend) => trend.update(record),
            Indicator::Roc(roc) => roc.update(record),
            Indicator::LastRecord(last) => last.update(record),
        }
    }

    /// Records currently buffered.
    pub fn len(&self) -> usize {
        match self {
            Indicator::Rsi(rsi) => rsi.len(),
            Indicator::Trend(trend) => trend.len(),
            Indicator::Roc(roc) => roc.len(),
            Indicator::LastRecord(last) => usize::from(last.value().is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
