//! tradebot: single-asset RSI strategy backtester.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command dispatch in [`cli`].
//!
//! One pass over a price history feeds a shared indicator bank, then every
//! configured strategy automaton, each trading its own wallet.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
