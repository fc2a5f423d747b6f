//! End-of-run results per strategy.

use chrono::NaiveDate;

use super::automaton::Automaton;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub label: String,
    pub total_capital: f64,
    /// `total_capital - initial_capital`
    pub pnl: f64,
    /// Percentage of the initial capital, signed.
    pub return_pct: f64,
    pub buys: usize,
    pub sells: usize,
    pub max_drawdown: f64,
    pub bankrupt: bool,
    pub final_cash: f64,
    pub final_asset_qty: f64,
}

impl StrategyResult {
    pub fn from_automaton(automaton: &Automaton, initial_capital: f64) -> Self {
        let total_capital = automaton.total_capital();
        let pnl = total_capital - initial_capital;
        let return_pct = if initial_capital > 0.0 {
            pnl / initial_capital * 100.0
        } else {
            0.0
        };

        Self {
            label: automaton.label().to_string(),
            total_capital,
            pnl,
            return_pct,
            buys: automaton.buys(),
            sells: automaton.sells(),
            max_drawdown: automaton.max_drawdown(),
            bankrupt: automaton.is_bankrupt(),
            final_cash: automaton.wallet().cash(),
            final_asset_qty: automaton.wallet().asset_qty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub records_processed: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub window: usize,
    /// One entry per strategy, in configuration order.
    pub strategies: Vec<StrategyResult>,
}

impl BacktestResult {
    /// Strategy with the highest final capital; the first one wins ties.
    pub fn best(&self) -> Option<&StrategyResult> {
        self.strategies.iter().fold(None, |best, s| match best {
            Some(b) if b.total_capital >= s.total_capital => Some(b),
            _ => Some(s),
        })
    }

    pub fn get(&self, label: &str) -> Option<&StrategyResult> {
        self.strategies.iter().find(|s| s.label == label)
    }
}
