//! Strategy configuration and decision logic.
//!
//! A strategy is plain data: a display label plus one [`StrategyKind`]
//! variant carrying its parameters. Each kind declares the indicators it
//! reads; sizing itself is a pure function of those readings and the wallet.

use std::fmt;

use crate::domain::error::TradebotError;
use crate::domain::indicator::{FeatureView, IndicatorKind, MAX_WINDOW, TrendDirection};
use crate::domain::rate::Rate;
use crate::domain::wallet::Wallet;

/// Longest duration whose `d + 1` requirement still fits [`MAX_WINDOW`].
pub const MAX_DURATION: usize = MAX_WINDOW - 1;

const RSI_ONLY: &[IndicatorKind] = &[IndicatorKind::Rsi];
const RSI_AND_TREND: &[IndicatorKind] = &[IndicatorKind::Rsi, IndicatorKind::Trend];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub buy: f64,
    pub sell: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentPlan {
    pub thresholds: Thresholds,
    /// Fraction of cash (buy) or asset value (sell) traded per signal.
    pub investment: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    /// Invests all cash on the first step, then holds.
    LongTerm,
    Proportional {
        duration: usize,
    },
    ProportionalWithTrend {
        duration: usize,
        trend_threshold: f64,
    },
    Thresholds {
        duration: usize,
        plan: InvestmentPlan,
    },
    ThresholdsWithTrend {
        duration: usize,
        plan: InvestmentPlan,
        trend_threshold: f64,
    },
}

/// A cash-denominated instruction for a wallet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Order {
    Buy(f64),
    Sell(f64),
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Buy(amount) => write!(f, "buy {amount:.2}"),
            Order::Sell(amount) => write!(f, "sell {amount:.2}"),
        }
    }
}

impl StrategyKind {
    /// Indicators this kind reads, in the order it reads them.
    pub fn required_indicators(&self) -> &'static [IndicatorKind] {
        match self {
            StrategyKind::LongTerm => &[],
            StrategyKind::Proportional { .. } | StrategyKind::Thresholds { .. } => RSI_ONLY,
            StrategyKind::ProportionalWithTrend { .. }
            | StrategyKind::ThresholdsWithTrend { .. } => RSI_AND_TREND,
        }
    }

    pub fn duration(&self) -> Option<usize> {
        match self {
            StrategyKind::LongTerm => None,
            StrategyKind::Proportional { duration }
            | StrategyKind::ProportionalWithTrend { duration, .. }
            | StrategyKind::Thresholds { duration, .. }
            | StrategyKind::ThresholdsWithTrend { duration, .. } => Some(*duration),
        }
    }

    /// Records each declared indicator must hold before this kind can trade.
    pub fn window_requirements(&self) -> Vec<(IndicatorKind, usize)> {
        let duration = self.duration().unwrap_or(1);
        self.required_indicators()
            .iter()
            .map(|&kind| (kind, kind.records_required(duration)))
            .collect()
    }

    pub fn default_label(&self) -> String {
        match self {
            StrategyKind::LongTerm => "long term".to_string(),
            StrategyKind::Proportional { duration } => format!("RSI({duration}) proportional"),
            StrategyKind::ProportionalWithTrend {
                duration,
                trend_threshold,
            } => format!("RSI({duration}) proportional, trend {trend_threshold}"),
            StrategyKind::Thresholds { duration, plan } => {
                format!("RSI({duration}) thresholds {}", describe_plan(plan))
            }
            StrategyKind::ThresholdsWithTrend {
                duration,
                plan,
                trend_threshold,
            } => format!(
                "RSI({duration}) thresholds {}, trend {trend_threshold}",
                describe_plan(plan)
            ),
        }
    }

    /// Checks parameters ahead of any run.
    pub fn validate(&self, section: &str) -> Result<(), TradebotError> {
        if let Some(duration) = self.duration() {
            if !(2..=MAX_DURATION).contains(&duration) {
                return Err(TradebotError::invalid(
                    section,
                    "duration",
                    format!("duration must be between 2 and {MAX_DURATION}"),
                ));
            }
        }
        match self {
            StrategyKind::Thresholds { plan, .. } => validate_plan(section, plan),
            StrategyKind::ThresholdsWithTrend {
                plan,
                trend_threshold,
                ..
            } => {
                validate_plan(section, plan)?;
                validate_trend_threshold(section, *trend_threshold)
            }
            StrategyKind::ProportionalWithTrend {
                trend_threshold, ..
            } => validate_trend_threshold(section, *trend_threshold),
            StrategyKind::LongTerm | StrategyKind::Proportional { .. } => Ok(()),
        }
    }

    /// Reads the declared indicators and sizes at most one order.
    pub fn decide(
        &self,
        view: &FeatureView<'_>,
        wallet: &Wallet,
        first_invocation: bool,
    ) -> Result<Option<Order>, TradebotError> {
        let cash = wallet.cash();
        let asset_value = wallet.asset_value();

        match self {
            StrategyKind::LongTerm => Ok(first_invocation.then_some(Order::Buy(cash))),
            StrategyKind::Proportional { duration } => {
                let Some(rsi) = view.rsi()?.value_for_duration(*duration)? else {
                    return Ok(None);
                };
                Ok(proportional_order(rsi, cash, asset_value))
            }
            StrategyKind::ProportionalWithTrend {
                duration,
                trend_threshold,
            } => {
                let rsi = view.rsi()?.value_for_duration(*duration)?;
                let trend = view
                    .trend()?
                    .value_for_duration(*duration, *trend_threshold)?;
                let (Some(rsi), Some(trend)) = (rsi, trend) else {
                    return Ok(None);
                };
                Ok(proportional_order(rsi, cash, asset_value)
                    .filter(|order| trend_allows(*order, trend)))
            }
            StrategyKind::Thresholds { duration, plan } => {
                let Some(rsi) = view.rsi()?.value_for_duration(*duration)? else {
                    return Ok(None);
                };
                Ok(threshold_order(rsi, plan, cash, asset_value))
            }
            StrategyKind::ThresholdsWithTrend {
                duration,
                plan,
                trend_threshold,
            } => {
                let rsi = view.rsi()?.value_for_duration(*duration)?;
                let trend = view
                    .trend()?
                    .value_for_duration(*duration, *trend_threshold)?;
                let (Some(rsi), Some(trend)) = (rsi, trend) else {
                    return Ok(None);
                };
                Ok(threshold_order(rsi, plan, cash, asset_value)
                    .filter(|order| trend_allows(*order, trend)))
            }
        }
    }
}

/// Sizes continuously with the distance of RSI from 50.
pub fn proportional_order(rsi: Rate, cash: f64, asset_value: f64) -> Option<Order> {
    let ratio = rsi.value() / Rate::MIDPOINT.value();
    if rsi < Rate::MIDPOINT {
        Some(Order::Buy(cash * (1.0 - ratio)))
    } else if rsi > Rate::MIDPOINT {
        Some(Order::Sell(asset_value * (ratio - 1.0)))
    } else {
        None
    }
}

/// Fixed-fraction sizing outside strict thresholds.
pub fn threshold_order(
    rsi: Rate,
    plan: &InvestmentPlan,
    cash: f64,
    asset_value: f64,
) -> Option<Order> {
    let value = rsi.value();
    if value < plan.thresholds.buy {
        Some(Order::Buy(cash * plan.investment))
    } else if value > plan.thresholds.sell {
        Some(Order::Sell(asset_value * plan.investment))
    } else {
        None
    }
}

/// Buys ride an upward trend, sells a downward one; a stable market blocks both.
pub fn trend_allows(order: Order, trend: TrendDirection) -> bool {
    matches!(
        (order, trend),
        (Order::Buy(_), TrendDirection::Up) | (Order::Sell(_), TrendDirection::Down)
    )
}

fn describe_plan(plan: &InvestmentPlan) -> String {
    format!(
        "{}/{} x{}",
        plan.thresholds.buy, plan.thresholds.sell, plan.investment
    )
}

fn validate_plan(section: &str, plan: &InvestmentPlan) -> Result<(), TradebotError> {
    let Thresholds { buy, sell } = plan.thresholds;
    if !(Rate::MIN..=Rate::MAX).contains(&buy) {
        return Err(TradebotError::invalid(
            section,
            "buy_threshold",
            "buy_threshold must be between 0 and 100",
        ));
    }
    if !(Rate::MIN..=Rate::MAX).contains(&sell) {
        return Err(TradebotError::invalid(
            section,
            "sell_threshold",
            "sell_threshold must be between 0 and 100",
        ));
    }
    if buy > sell {
        return Err(TradebotError::invalid(
            section,
            "buy_threshold",
            "buy_threshold must not exceed sell_threshold",
        ));
    }
    if !(plan.investment > 0.0 && plan.investment <= 1.0) {
        return Err(TradebotError::invalid(
            section,
            "investment",
            "investment must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_trend_threshold(section: &str, threshold: f64) -> Result<(), TradebotError> {
    if !(threshold >= 0.0 && threshold.is_finite()) {
        return Err(TradebotError::invalid(
            section,
            "trend_threshold",
            "trend_threshold must be non-negative",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub label: String,
    pub kind: StrategyKind,
}

impl StrategyConfig {
    pub fn new(label: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    pub fn labelled(kind: StrategyKind) -> Self {
        Self {
            label: kind.default_label(),
            kind,
        }
    }
}
