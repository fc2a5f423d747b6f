//! Coarse trend classification.
//!
//! fluctuation_rate = C[0] / C[n] - 1, comparing the newest close with the
//! close n steps back. |rate| < threshold is Stable, otherwise the sign of
//! the rate decides (a zero rate with a zero threshold counts as Up).
//! Needs n + 1 buffered records.

use std::fmt;

use crate::domain::error::TradebotError;
use crate::domain::indicator::{IndicatorKind, RollingWindow, check_duration};
use crate::domain::record::PriceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Stable,
    Down,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trend {
    window: RollingWindow<PriceRecord>,
}

impl Trend {
    pub fn new(max_duration: usize) -> Self {
        Self {
            window: RollingWindow::new(max_duration),
        }
    }

    pub fn update(&mut self, record: &PriceRecord) {
        self.window.push(record.clone());
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn fluctuation_rate(&self, duration: usize) -> Result<Option<f64>, TradebotError> {
        check_duration(IndicatorKind::Trend, duration)?;

        let (Some(latest), Some(past)) = (self.window.newest(), self.window.get(duration)) else {
            return Ok(None);
        };
        Ok(Some(latest.close / past.close - 1.0))
    }

    pub fn value_for_duration(
        &self,
        duration: usize,
        fluctuation_threshold: f64,
    ) -> Result<Option<TrendDirection>, TradebotError> {
        Ok(self
            .fluctuation_rate(duration)?
            .map(|rate| classify(rate, fluctuation_threshold)))
    }
}

fn classify(rate: f64, threshold: f64) -> TrendDirection {
    if rate.abs() < threshold {
        TrendDirection::Stable
    } else if rate < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trend_from(closes: &[f64], capacity: usize) -> Trend {
        let mut trend = Trend::new(capacity);
        for (i, &close) in closes.iter().enumerate() {
            trend.update(&PriceRecord {
                date: NaiveDate::from_ymd_opt(2021, 3, i as u32 + 1).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: String::new(),
            });
        }
        trend
    }

    #[test]
    fn round_trip_is_stable() {
        let trend = trend_from(&[100.0, 90.0, 100.0], 14);
        assert_eq!(
            trend.value_for_duration(2, 0.05).unwrap(),
            Some(TrendDirection::Stable)
        );
    }

    #[test]
    fn rising_is_up() {
        let trend = trend_from(&[100.0, 105.0, 110.0], 14);
        assert_eq!(
            trend.value_for_duration(2, 0.05).unwrap(),
            Some(TrendDirection::Up)
        );
    }

    #[test]
    fn falling_is_down() {
        let trend = trend_from(&[100.0, 95.0, 90.0], 14);
        assert_eq!(
            trend.value_for_duration(2, 0.05).unwrap(),
            Some(TrendDirection::Down)
        );
    }

    #[test]
    fn change_at_threshold_is_not_stable() {
        // exactly +10% against a 0.1 threshold
        let trend = trend_from(&[100.0, 100.0, 110.0], 14);
        let rate = trend.fluctuation_rate(2).unwrap().unwrap();
        assert_eq!(
            trend.value_for_duration(2, rate).unwrap(),
            Some(TrendDirection::Up)
        );
    }

    #[test]
    fn zero_threshold_never_stable() {
        let trend = trend_from(&[100.0, 90.0, 100.0], 14);
        assert_eq!(
            trend.value_for_duration(2, 0.0).unwrap(),
            Some(TrendDirection::Up)
        );
    }

    #[test]
    fn needs_duration_plus_one_records() {
        let trend = trend_from(&[100.0, 101.0], 14);
        assert_eq!(trend.value_for_duration(2, 0.0).unwrap(), None);

        let trend = trend_from(&[100.0, 101.0, 102.0], 14);
        assert!(trend.value_for_duration(2, 0.0).unwrap().is_some());
    }

    #[test]
    fn rejects_duration_one() {
        let trend = trend_from(&[100.0, 101.0, 102.0], 14);
        assert!(matches!(
            trend.value_for_duration(1, 0.0),
            Err(TradebotError::InvalidDuration { indicator: IndicatorKind::Trend, .. })
        ));
    }

    #[test]
    fn capacity_limits_lookback() {
        let trend = trend_from(&[100.0, 101.0, 102.0, 103.0], 3);
        assert_eq!(trend.len(), 3);
        assert_eq!(trend.value_for_duration(3, 0.0).unwrap(), None);
    }
}
