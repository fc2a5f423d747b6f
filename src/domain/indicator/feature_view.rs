//! Narrowed read-only projection of the indicator bank.
//!
//! A strategy only ever sees the indicators it declared. Reading any other
//! kind through the view is a [`TradebotError::MissingIndicator`].

use crate::domain::error::TradebotError;
use crate::domain::indicator::{Indicator, IndicatorKind, LastRecord, Roc, Rsi, Trend};

#[derive(Debug, Clone)]
pub struct FeatureView<'a> {
    owner: &'a str,
    features: Vec<&'a Indicator>,
}

impl<'a> FeatureView<'a> {
    pub(crate) fn new(owner: &'a str, features: Vec<&'a Indicator>) -> Self {
        Self { owner, features }
    }

    pub fn owner(&self) -> &'a str {
        self.owner
    }

    /// Declared kinds, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.features.iter().map(|f| f.kind())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&'a Indicator> {
        self.features.iter().copied().find(|f| f.kind() == kind)
    }

    fn require(&self, kind: IndicatorKind) -> Result<&'a Indicator, TradebotError> {
        self.get(kind).ok_or_else(|| TradebotError::MissingIndicator {
            strategy: self.owner.to_string(),
            indicator: kind,
        })
    }

    pub fn rsi(&self) -> Result<&'a Rsi, TradebotError> {
        match self.require(IndicatorKind::Rsi)? {
            Indicator::Rsi(rsi) => Ok(rsi),
            _ => unreachable!("indicator stored under the wrong kind"),
        }
    }

    pub fn trend(&self) -> Result<&'a Trend, TradebotError> {
        match self.require(IndicatorKind::Trend)? {
            Indicator::Trend(trend) => Ok(trend),
            _ => unreachable!("indicator stored under the wrong kind"),
        }
    }

    pub fn roc(&self) -> Result<&'a Roc, TradebotError> {
        match self.require(IndicatorKind::Roc)? {
            Indicator::Roc(roc) => Ok(roc),
            _ => unreachable!("indicator stored under the wrong kind"),
        }
    }

    pub fn last_record(&self) -> Result<&'a LastRecord, TradebotError> {
        match self.require(IndicatorKind::LastRecord)? {
            Indicator::LastRecord(last) => Ok(last),
            _ => unreachable!("indicator stored under the wrong kind"),
        }
    }
}
