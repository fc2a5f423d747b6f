//! Daily price record.

use chrono::NaiveDate;

use crate::domain::error::TradebotError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: String,
}

impl PriceRecord {
    /// Rejects records that would corrupt indicator or wallet math.
    pub fn validate(&self) -> Result<(), TradebotError> {
        let corrupt = |reason: &str| TradebotError::CorruptRecord {
            date: self.date.to_string(),
            reason: reason.to_string(),
        };

        if [self.open, self.high, self.low, self.close]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(corrupt("non-finite price"));
        }
        if self.high < self.low {
            return Err(corrupt("high below low"));
        }
        if self.close <= 0.0 {
            return Err(corrupt("close must be positive"));
        }
        Ok(())
    }

    /// close / open
    pub fn price_fluctuation_rate(&self) -> f64 {
        self.close / self.open
    }

    /// open - close
    pub fn variation(&self) -> f64 {
        self.open - self.close
    }

    pub fn variation_rate(&self) -> f64 {
        self.price_fluctuation_rate() - 1.0
    }

    /// high - low
    pub fn amplitude(&self) -> f64 {
        self.high - self.low
    }

    pub fn amplitude_rate(&self) -> f64 {
        (self.high / self.low) - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(2021, 8, 2).unwrap(),
            open: 2500.0,
            high: 2650.0,
            low: 2400.0,
            close: 2600.0,
            volume: "N/A".into(),
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn high_below_low_is_corrupt() {
        let record = PriceRecord {
            high: 2300.0,
            ..sample_record()
        };
        let err = record.validate().unwrap_err();
        assert!(
            matches!(err, TradebotError::CorruptRecord { ref reason, .. } if reason == "high below low")
        );
    }

    #[test]
    fn nan_price_is_corrupt() {
        let record = PriceRecord {
            close: f64::NAN,
            ..sample_record()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn zero_close_is_corrupt() {
        let record = PriceRecord {
            close: 0.0,
            low: 0.0,
            ..sample_record()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn fluctuation_and_variation() {
        let r = sample_record();
        assert!((r.price_fluctuation_rate() - 1.04).abs() < 1e-12);
        assert!((r.variation() - (-100.0)).abs() < f64::EPSILON);
        assert!((r.variation_rate() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn amplitude() {
        let r = sample_record();
        assert!((r.amplitude() - 250.0).abs() < f64::EPSILON);
        // 2650 / 2400 - 1
        assert!((r.amplitude_rate() - (2650.0 / 2400.0 - 1.0)).abs() < f64::EPSILON);
    }
}
