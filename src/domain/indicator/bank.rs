//! Indicator bank: one live instance per configured [`IndicatorKind`].

use std::collections::BTreeMap;

use crate::domain::error::TradebotError;
use crate::domain::indicator::{FeatureView, Indicator, IndicatorKind};
use crate::domain::record::PriceRecord;

/// Smallest window that can answer a duration-2 query.
pub const MIN_WINDOW: usize = 2;

/// Largest window a bank accepts.
pub const MAX_WINDOW: usize = 10_000;

#[derive(Debug, Clone)]
pub struct IndicatorBank {
    indicators: BTreeMap<IndicatorKind, Indicator>,
    window: usize,
}

impl IndicatorBank {
    pub fn new(kinds: &[IndicatorKind], window: usize) -> Result<Self, TradebotError> {
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
            return Err(TradebotError::invalid(
                "backtest",
                "window",
                format!("window must be between {MIN_WINDOW} and {MAX_WINDOW}"),
            ));
        }
        let indicators = kinds
            .iter()
            .map(|&kind| (kind, Indicator::new(kind, window)))
            .collect();
        Ok(Self { indicators, window })
    }

    pub fn with_all(window: usize) -> Result<Self, TradebotError> {
        Self::new(&IndicatorKind::ALL, window)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.indicators.contains_key(&kind)
    }

    /// Kinds in their fixed update order.
    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.indicators.keys().copied()
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&Indicator> {
        self.indicators.get(&kind)
    }

    /// Feeds `record` to every indicator, always in the same order.
    pub fn update(&mut self, record: &PriceRecord) {
        for indicator in self.indicators.values_mut() {
            indicator.update(record);
        }
    }

    /// Fails if `requested` names a kind this bank does not hold.
    pub fn ensure_provides(
        &self,
        owner: &str,
        requested: &[IndicatorKind],
    ) -> Result<(), TradebotError> {
        match requested.iter().find(|kind| !self.contains(**kind)) {
            Some(&indicator) => Err(TradebotError::MissingIndicator {
                strategy: owner.to_string(),
                indicator,
            }),
            None => Ok(()),
        }
    }

    /// Borrows exactly the `requested` indicators, in the requested order.
    pub fn view<'a>(
        &'a self,
        owner: &'a str,
        requested: &[IndicatorKind],
    ) -> Result<FeatureView<'a>, TradebotError> {
        let features = requested
            .iter()
            .map(|&kind| {
                self.get(kind).ok_or_else(|| TradebotError::MissingIndicator {
                    strategy: owner.to_string(),
                    indicator: kind,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureView::new(owner, features))
    }
}
