//! ROC (Rate of Change) over a rolling window.
//!
//! ROC(n) = ((C[0] - C[n]) / C[n]) * 100, C[0] being the newest close.
//! If C[n] == 0: ROC = 0
//! Needs n + 1 buffered records.

use crate::domain::error::TradebotError;
use crate::domain::indicator::{IndicatorKind, RollingWindow, check_duration};
use crate::domain::record::PriceRecord;

#[derive(Debug, Clone)]
pub struct Roc {
    window: RollingWindow<PriceRecord>,
}

impl Roc {
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

    pub fn value_for_duration(&self, duration: usize) -> Result<Option<f64>, TradebotError> {
        check_duration(IndicatorKind::Roc, duration)?;

        let (Some(latest), Some(past)) = (self.window.newest(), self.window.get(duration)) else {
            return Ok(None);
        };

        if past.close == 0.0 {
            return Ok(Some(0.0));
        }
        Ok(Some(((latest.close - past.close) / past.close) * 100.0))
    }
}
