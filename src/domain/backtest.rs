//! Backtest engine and event loop.
//!
//! BacktestConfig defines run parameters. [`Simulation`] is the single-pass
//! loop: every record first updates the whole indicator bank, then each
//! automaton in configuration order. All checks that can fail on the
//! configuration alone run in [`Simulation::configure`], before any record.

use chrono::NaiveDate;

use crate::domain::automaton::{Automaton, BankruptcyPolicy};
use crate::domain::error::TradebotError;
use crate::domain::indicator::{IndicatorBank, IndicatorKind};
use crate::domain::metrics::{BacktestResult, StrategyResult};
use crate::domain::record::PriceRecord;
use crate::domain::strategy::StrategyConfig;

/// Window used when no strategy needs a longer one.
pub const DEFAULT_WINDOW: usize = 14;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Indicator window capacity; derived from the strategies when unset.
    pub window: Option<usize>,
    pub indicators: Vec<IndicatorKind>,
    pub bankruptcy_policy: BankruptcyPolicy,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            window: None,
            indicators: IndicatorKind::ALL.to_vec(),
            bankruptcy_policy: BankruptcyPolicy::Continue,
            start_date: None,
            end_date: None,
        }
    }
}

impl BacktestConfig {
    fn in_range(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Picks the bank window, failing if an explicit one cannot serve every strategy.
pub fn resolve_window(
    config: &BacktestConfig,
    strategies: &[StrategyConfig],
) -> Result<usize, TradebotError> {
    let requirements = strategies.iter().flat_map(|s| {
        s.kind
            .window_requirements()
            .into_iter()
            .map(move |(indicator, required)| (s, indicator, required))
    });

    match config.window {
        Some(window) => {
            for (strategy, indicator, required) in requirements {
                if required > window {
                    return Err(TradebotError::WindowTooShort {
                        strategy: strategy.label.clone(),
                        indicator,
                        required,
                        window,
                    });
                }
            }
            Ok(window)
        }
        None => Ok(requirements
            .map(|(_, _, required)| required)
            .fold(DEFAULT_WINDOW, usize::max)),
    }
}

/// Returns records oldest-first, whatever order they were delivered in.
pub fn chronological(records: &[PriceRecord]) -> Result<Vec<&PriceRecord>, TradebotError> {
    let mut ordered: Vec<&PriceRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);
    if let Some(pair) = ordered.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(TradebotError::DuplicateDate { date: pair[0].date });
    }
    Ok(ordered)
}

#[derive(Debug)]
pub struct Simulation {
    bank: IndicatorBank,
    automata: Vec<Automaton>,
    policy: BankruptcyPolicy,
    initial_capital: f64,
    records_processed: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
}

impl Simulation {
    pub fn configure(
        strategies: Vec<StrategyConfig>,
        config: &BacktestConfig,
    ) -> Result<Self, TradebotError> {
        if !(config.initial_capital > 0.0 && config.initial_capital.is_finite()) {
            return Err(TradebotError::invalid(
                "backtest",
                "initial_capital",
                "initial_capital must be positive",
            ));
        }
        if strategies.is_empty() {
            return Err(TradebotError::missing("strategy", "type"));
        }
        for strategy in &strategies {
            strategy.kind.validate(&strategy.label)?;
        }

        let window = resolve_window(config, &strategies)?;
        let bank = IndicatorBank::new(&config.indicators, window)?;
        for strategy in &strategies {
            bank.ensure_provides(&strategy.label, strategy.kind.required_indicators())?;
        }

        tracing::info!(
            strategies = strategies.len(),
            window,
            initial_capital = config.initial_capital,
            policy = ?config.bankruptcy_policy,
            "simulation configured"
        );

        let automata = strategies
            .into_iter()
            .map(|s| Automaton::new(s, config.initial_capital))
            .collect();

        Ok(Self {
            bank,
            automata,
            policy: config.bankruptcy_policy,
            initial_capital: config.initial_capital,
            records_processed: 0,
            first_date: None,
            last_date: None,
        })
    }

    pub fn bank(&self) -> &IndicatorBank {
        &self.bank
    }

    pub fn automata(&self) -> &[Automaton] {
        &self.automata
    }

    pub fn records_processed(&self) -> usize {
        self.records_processed
    }

    /// One step: indicators first, then every automaton against the updated bank.
    pub fn step(&mut self, record: &PriceRecord) -> Result<(), TradebotError> {
        record.validate()?;

        self.bank.update(record);
        for automaton in &mut self.automata {
            automaton.step(record, &self.bank, self.policy)?;
        }

        self.records_processed += 1;
        self.first_date.get_or_insert(record.date);
        self.last_date = Some(record.date);
        Ok(())
    }

    pub fn finish(self) -> BacktestResult {
        let strategies: Vec<StrategyResult> = self
            .automata
            .iter()
            .map(|a| StrategyResult::from_automaton(a, self.initial_capital))
            .collect();

        tracing::info!(
            records = self.records_processed,
            bankrupt = strategies.iter().filter(|s| s.bankrupt).count(),
            "simulation complete"
        );

        BacktestResult {
            initial_capital: self.initial_capital,
            records_processed: self.records_processed,
            first_date: self.first_date,
            last_date: self.last_date,
            window: self.bank.window(),
            strategies,
        }
    }
}

/// Configures, replays `records` in chronological order, and reports.
pub fn run_backtest(
    records: &[PriceRecord],
    strategies: Vec<StrategyConfig>,
    config: &BacktestConfig,
) -> Result<BacktestResult, TradebotError> {
    let mut simulation = Simulation::configure(strategies, config)?;

    let ordered: Vec<&PriceRecord> = chronological(records)?
        .into_iter()
        .filter(|r| config.in_range(r.date))
        .collect();
    if ordered.is_empty() {
        return Err(TradebotError::NoData);
    }

    for record in ordered {
        simulation.step(record)?;
    }
    Ok(simulation.finish())
}
