//! Configuration loading and validation.
//!
//! Reads the `[backtest]` section and every `[strategy.<id>]` section into
//! engine types. Every field is checked here, before any record is read.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::automaton::BankruptcyPolicy;
use crate::domain::backtest::BacktestConfig;
use crate::domain::catalog::default_strategies;
use crate::domain::error::TradebotError;
use crate::domain::indicator::{IndicatorKind, MAX_WINDOW, MIN_WINDOW};
use crate::domain::strategy::{InvestmentPlan, StrategyConfig, StrategyKind, Thresholds};
use crate::ports::config_port::ConfigPort;

const BACKTEST: &str = "backtest";
const STRATEGY_PREFIX: &str = "strategy.";

pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TradebotError> {
    let mut loaded = BacktestConfig::default();

    if let Some(capital) = parse_key::<f64>(config, BACKTEST, "initial_capital")? {
        if !(capital > 0.0 && capital.is_finite()) {
            return Err(TradebotError::invalid(
                BACKTEST,
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
        loaded.initial_capital = capital;
    }

    if let Some(window) = parse_key::<usize>(config, BACKTEST, "window")? {
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
            return Err(TradebotError::invalid(
                BACKTEST,
                "window",
                format!("window must be between {MIN_WINDOW} and {MAX_WINDOW}"),
            ));
        }
        loaded.window = Some(window);
    }

    if let Some(list) = config.get_string(BACKTEST, "indicators") {
        loaded.indicators = parse_indicators(&list)?;
    }

    if let Some(policy) = parse_key::<BankruptcyPolicy>(config, BACKTEST, "bankruptcy_policy")? {
        loaded.bankruptcy_policy = policy;
    }

    loaded.start_date = parse_date(config, "start_date")?;
    loaded.end_date = parse_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (loaded.start_date, loaded.end_date) {
        if start > end {
            return Err(TradebotError::invalid(
                BACKTEST,
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }

    Ok(loaded)
}

/// Strategies from `[strategy.<id>]` sections in section-name order, or the
/// default catalog when there are none.
pub fn load_strategies(config: &dyn ConfigPort) -> Result<Vec<StrategyConfig>, TradebotError> {
    let sections: Vec<String> = config
        .sections()
        .into_iter()
        .filter(|s| s.starts_with(STRATEGY_PREFIX))
        .collect();

    if sections.is_empty() {
        tracing::debug!("no strategy sections, using the default catalog");
        return Ok(default_strategies());
    }

    sections
        .iter()
        .map(|section| load_strategy(config, section))
        .collect()
}

fn load_strategy(config: &dyn ConfigPort, section: &str) -> Result<StrategyConfig, TradebotError> {
    let kind_name = config
        .get_string(section, "type")
        .ok_or_else(|| TradebotError::missing(section, "type"))?;

    let kind = match kind_name.trim().to_ascii_lowercase().as_str() {
        "long_term" => StrategyKind::LongTerm,
        "proportional" => StrategyKind::Proportional {
            duration: require_key(config, section, "duration")?,
        },
        "proportional_trend" => StrategyKind::ProportionalWithTrend {
            duration: require_key(config, section, "duration")?,
            trend_threshold: require_key(config, section, "trend_threshold")?,
        },
        "thresholds" => StrategyKind::Thresholds {
            duration: require_key(config, section, "duration")?,
            plan: load_plan(config, section)?,
        },
        "thresholds_trend" => StrategyKind::ThresholdsWithTrend {
            duration: require_key(config, section, "duration")?,
            plan: load_plan(config, section)?,
            trend_threshold: require_key(config, section, "trend_threshold")?,
        },
        other => {
            return Err(TradebotError::invalid(
                section,
                "type",
                format!("unknown strategy type '{other}'"),
            ));
        }
    };
    kind.validate(section)?;

    let strategy = match config.get_string(section, "label") {
        Some(label) if !label.trim().is_empty() => StrategyConfig::new(label.trim(), kind),
        _ => StrategyConfig::labelled(kind),
    };
    Ok(strategy)
}

fn load_plan(config: &dyn ConfigPort, section: &str) -> Result<InvestmentPlan, TradebotError> {
    Ok(InvestmentPlan {
        thresholds: Thresholds {
            buy: require_key(config, section, "buy_threshold")?,
            sell: require_key(config, section, "sell_threshold")?,
        },
        investment: require_key(config, section, "investment")?,
    })
}

fn parse_indicators(list: &str) -> Result<Vec<IndicatorKind>, TradebotError> {
    let mut kinds = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let kind = name
            .parse::<IndicatorKind>()
            .map_err(|e| TradebotError::invalid(BACKTEST, "indicators", e))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(TradebotError::invalid(
            BACKTEST,
            "indicators",
            "at least one indicator is required",
        ));
    }
    Ok(kinds)
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, TradebotError> {
    match config.get_string(BACKTEST, key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                TradebotError::invalid(
                    BACKTEST,
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
    }
}

fn parse_key<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<T>, TradebotError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TradebotError::invalid(section, key, format!("'{raw}': {e}"))),
    }
}

fn require_key<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<T, TradebotError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_key(config, section, key)?.ok_or_else(|| TradebotError::missing(section, key))
}
