//! Report generation port trait.

use crate::domain::error::TradebotError;
use crate::domain::metrics::BacktestResult;

/// Port for writing backtest reports.
pub trait ReportPort {
    /// Renders `result` to `out`.
    fn write(
        &self,
        result: &BacktestResult,
        out: &mut dyn std::io::Write,
    ) -> Result<(), TradebotError>;

    /// Default implementation: renders into a freshly created file.
    fn write_to_path(
        &self,
        result: &BacktestResult,
        path: &std::path::Path,
    ) -> Result<(), TradebotError> {
        let mut file = std::fs::File::create(path)?;
        self.write(result, &mut file)
    }
}
