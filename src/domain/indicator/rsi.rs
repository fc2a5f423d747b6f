//! RSI (Relative Strength Index) over a rolling window.
//!
//! For a query at duration n, the n most recent closes give n-1
//! period-over-period percentage changes:
//!   change[i] = (C[i] / C[i+1]) * 100 - 100   (i = 0 is the newest record)
//!
//! Gains are changes > 0, losses are |changes| < 0, flat changes count for
//! neither; both sums are averaged over n-1.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 when avg_gain > 0, 50 when the window is flat.

use crate::domain::error::TradebotError;
use crate::domain::indicator::{IndicatorKind, RollingWindow, check_duration};
use crate::domain::rate::Rate;
use crate::domain::record::PriceRecord;

#[derive(Debug, Clone)]
pub struct Rsi {
    window: RollingWindow<PriceRecord>,
}

impl Rsi {
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

    pub fn max_duration(&self) -> usize {
        self.window.capacity()
    }

    pub fn value_for_duration(&self, duration: usize) -> Result<Option<Rate>, TradebotError> {
        check_duration(IndicatorKind::Rsi, duration)?;

        if self.window.len() < duration {
            return Ok(None);
        }

        let mut gains = 0.0;
        let mut losses = 0.0;
        for (newer, older) in self
            .window
            .iter()
            .zip(self.window.iter().skip(1))
            .take(duration - 1)
        {
            let change = (newer.close / older.close) * 100.0 - 100.0;
            if change > 0.0 {
                gains += change;
            } else if change < 0.0 {
                losses += -change;
            }
        }

        let periods = (duration - 1) as f64;
        let avg_gain = gains / periods;
        let avg_loss = losses / periods;

        let rsi = if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };

        Rate::new(rsi).map(Some)
    }
}
