//! Trading automaton: one strategy driving its own wallet.
//!
//! Per-step protocol, strictly ordered:
//! 1. [`Automaton::update`] refreshes the wallet price and checks solvency
//! 2. [`Automaton::process`] lets the strategy read its feature view and trade

use std::sync::Arc;

use crate::domain::error::TradebotError;
use crate::domain::indicator::{FeatureView, IndicatorBank, IndicatorKind};
use crate::domain::record::PriceRecord;
use crate::domain::strategy::{Order, StrategyConfig, StrategyKind};
use crate::domain::wallet::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonStatus {
    Active,
    /// Terminal: total capital reached zero.
    Bankrupt,
}

/// What a bankrupt automaton does on later steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BankruptcyPolicy {
    /// Keep trading.
    #[default]
    Continue,
    /// Stop trading, keep marking the wallet to market.
    Suspend,
}

impl std::str::FromStr for BankruptcyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(BankruptcyPolicy::Continue),
            "suspend" => Ok(BankruptcyPolicy::Suspend),
            other => Err(format!("unknown bankruptcy policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Automaton {
    label: Arc<str>,
    kind: StrategyKind,
    wallet: Wallet,
    status: AutomatonStatus,
    invocations: usize,
    buys: usize,
    sells: usize,
    peak_capital: f64,
    max_drawdown: f64,
}

impl Automaton {
    pub fn new(config: StrategyConfig, initial_capital: f64) -> Self {
        Self {
            label: Arc::from(config.label),
            kind: config.kind,
            wallet: Wallet::new(initial_capital),
            status: AutomatonStatus::Active,
            invocations: 0,
            buys: 0,
            sells: 0,
            peak_capital: initial_capital,
            max_drawdown: 0.0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &StrategyKind {
        &self.kind
    }

    pub fn required_indicators(&self) -> &'static [IndicatorKind] {
        self.kind.required_indicators()
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn status(&self) -> AutomatonStatus {
        self.status
    }

    pub fn is_bankrupt(&self) -> bool {
        self.status == AutomatonStatus::Bankrupt
    }

    pub fn total_capital(&self) -> f64 {
        self.wallet.total_capital()
    }

    pub fn buys(&self) -> usize {
        self.buys
    }

    pub fn sells(&self) -> usize {
        self.sells
    }

    /// Largest peak-to-trough drop of total capital, as a fraction of the peak.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    /// Step 1: mark the wallet to market and check solvency.
    pub fn update(&mut self, record: &PriceRecord) -> AutomatonStatus {
        self.wallet.update(record);

        let capital = self.wallet.total_capital();
        if capital > self.peak_capital {
            self.peak_capital = capital;
        } else if self.peak_capital > 0.0 {
            let drawdown = (self.peak_capital - capital) / self.peak_capital;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }

        if self.status == AutomatonStatus::Active && self.wallet.is_bankrupt() {
            self.status = AutomatonStatus::Bankrupt;
            tracing::warn!(
                strategy = %self.label,
                date = %record.date,
                capital,
                "strategy is bankrupt"
            );
        }
        self.status
    }

    /// Step 2: strategy decision against the declared indicators.
    pub fn process(&mut self, view: &FeatureView<'_>) -> Result<(), TradebotError> {
        let first_invocation = self.invocations == 0;
        self.invocations += 1;

        let decision = self.kind.decide(view, &self.wallet, first_invocation)?;
        if let Some(order) = decision {
            self.execute(order)?;
        }
        Ok(())
    }

    /// Runs the whole protocol for one record, honoring `policy` once bankrupt.
    ///
    /// `bank` must already hold `record`.
    pub fn step(
        &mut self,
        record: &PriceRecord,
        bank: &IndicatorBank,
        policy: BankruptcyPolicy,
    ) -> Result<(), TradebotError> {
        let status = self.update(record);
        if status == AutomatonStatus::Bankrupt && policy == BankruptcyPolicy::Suspend {
            return Ok(());
        }
        let label = Arc::clone(&self.label);
        let view = bank.view(&label, self.required_indicators())?;
        self.process(&view)
    }

    fn execute(&mut self, order: Order) -> Result<(), TradebotError> {
        let executed = match order {
            Order::Buy(amount) => self.wallet.buy_up_to(amount)?,
            Order::Sell(amount) => self.wallet.sell_up_to(amount)?,
        };
        if executed <= 0.0 {
            return Ok(());
        }
        match order {
            Order::Buy(_) => self.buys += 1,
            Order::Sell(_) => self.sells += 1,
        }
        tracing::debug!(
            strategy = %self.label,
            %order,
            executed,
            price = self.wallet.last_price(),
            "order executed"
        );
        Ok(())
    }
}
