//! Percentage value bounded to [0, 100].

use std::fmt;

use crate::domain::error::TradebotError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
    pub const MIDPOINT: Rate = Rate(50.0);

    pub fn new(value: f64) -> Result<Self, TradebotError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(TradebotError::RateOutOfRange { value });
        }
        Ok(Rate(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rate {
    type Error = TradebotError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rate::new(value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
