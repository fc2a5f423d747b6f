//! Built-in strategy catalog, used when a config declares no strategies.

use super::strategy::{InvestmentPlan, StrategyConfig, StrategyKind, Thresholds};

const PROPORTIONAL_DURATIONS: [usize; 4] = [4, 6, 7, 14];
const THRESHOLD_DURATION: usize = 14;
const THRESHOLD_PAIRS: [(f64, f64); 3] = [(30.0, 70.0), (40.0, 60.0), (45.0, 55.0)];
const INVESTMENTS: [f64; 2] = [0.5, 0.25];

pub fn default_strategies() -> Vec<StrategyConfig> {
    let mut strategies = vec![StrategyConfig::labelled(StrategyKind::LongTerm)];

    strategies.extend(
        PROPORTIONAL_DURATIONS
            .iter()
            .map(|&duration| StrategyConfig::labelled(StrategyKind::Proportional { duration })),
    );

    for &(buy, sell) in &THRESHOLD_PAIRS {
        for &investment in &INVESTMENTS {
            strategies.push(StrategyConfig::labelled(StrategyKind::Thresholds {
                duration: THRESHOLD_DURATION,
                plan: InvestmentPlan {
                    thresholds: Thresholds { buy, sell },
                    investment,
                },
            }));
        }
    }
    strategies
}
