//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::OrbError;
use std::path::Path;

/// Port for persisting backtest results.
pub trait ReportPort {
    /// Write the flat trade record sequence.
    fn write_trades(&self, result: &BacktestResult, output_path: &Path) -> Result<(), OrbError>;

    /// Write the per-bar signal series with the session ORH/ORL overlay,
    /// for external charting.
    fn write_signals(&self, result: &BacktestResult, output_path: &Path) -> Result<(), OrbError>;
}
