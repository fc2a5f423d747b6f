//! CSV export of per-strategy results.

use crate::domain::error::TradebotError;
use crate::domain::metrics::BacktestResult;
use crate::ports::report_port::ReportPort;

const HEADER: [&str; 10] = [
    "label",
    "total_capital",
    "pnl",
    "return_pct",
    "buys",
    "sells",
    "max_drawdown",
    "bankrupt",
    "final_cash",
    "final_asset_qty",
];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn csv_error(e: csv::Error) -> TradebotError {
    TradebotError::Io(std::io::Error::other(e.to_string()))
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        out: &mut dyn std::io::Write,
    ) -> Result<(), TradebotError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(HEADER).map_err(csv_error)?;
        for s in &result.strategies {
            wtr.write_record([
                s.label.clone(),
                format!("{:.2}", s.total_capital),
                format!("{:.2}", s.pnl),
                format!("{:.4}", s.return_pct),
                s.buys.to_string(),
                s.sells.to_string(),
                format!("{:.4}", s.max_drawdown),
                s.bankrupt.to_string(),
                format!("{:.2}", s.final_cash),
                format!("{:.6}", s.final_asset_qty),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
