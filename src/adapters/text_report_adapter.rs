//! Fixed-width text report.

use crate::domain::error::TradebotError;
use crate::domain::metrics::{BacktestResult, StrategyResult};
use crate::ports::report_port::ReportPort;
use std::io::Write;

const MIN_LABEL_WIDTH: usize = 8;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn format_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

fn format_row(s: &StrategyResult, width: usize) -> String {
    format!(
        "{:<width$}  {:>12.2}  {:>10.2}  {:>9}  {:>5}  {:>5}  {:>7.2}%  {:>8}",
        s.label,
        s.total_capital,
        s.pnl,
        format_pct(s.return_pct),
        s.buys,
        s.sells,
        s.max_drawdown * 100.0,
        if s.bankrupt { "yes" } else { "no" },
    )
}

fn format_span(result: &BacktestResult) -> String {
    match (result.first_date, result.last_date) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "no records".to_string(),
    }
}

pub fn format_report(result: &BacktestResult) -> String {
    let width = result
        .strategies
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_LABEL_WIDTH);

    let mut output = String::new();
    output.push_str(&format!(
        "Backtest: {} records ({}), window {}, initial capital {:.2}\n\n",
        result.records_processed,
        format_span(result),
        result.window,
        result.initial_capital,
    ));
    output.push_str(&format!(
        "{:<width$}  {:>12}  {:>10}  {:>9}  {:>5}  {:>5}  {:>8}  {:>8}\n",
        "Strategy", "Capital", "P&L", "Return", "Buys", "Sells", "Max DD", "Bankrupt",
    ));
    for s in &result.strategies {
        output.push_str(&format_row(s, width));
        output.push('\n');
    }
    if let Some(best) = result.best() {
        output.push_str(&format!(
            "\nBest: {} ({})\n",
            best.label,
            format_pct(best.return_pct)
        ));
    }
    output
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), TradebotError> {
        out.write_all(format_report(result).as_bytes())?;
        Ok(())
    }
}
