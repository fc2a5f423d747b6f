//! Core domain types and logic.

pub mod automaton;
pub mod backtest;
pub mod catalog;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod rate;
pub mod record;
pub mod strategy;
pub mod wallet;
