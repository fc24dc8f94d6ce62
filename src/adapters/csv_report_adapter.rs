//! CSV report adapter.
//!
//! Writes the flat trade sequence in the `ORB_trend_analysis.csv` layout,
//! and optionally a per-bar signal/ORH/ORL series for external charting.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::OrbError;
use crate::domain::simulator::OutcomeMetric;
use crate::domain::trade::Outcome;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDateTime;
use std::path::Path;

pub struct CsvReportAdapter {
    metric: OutcomeMetric,
}

impl CsvReportAdapter {
    pub fn new(metric: OutcomeMetric) -> Self {
        Self { metric }
    }

    fn outcome_column(&self) -> &'static str {
        match self.metric {
            OutcomeMetric::Pnl => "pnl",
            OutcomeMetric::RangeMultiple => "max_levels",
        }
    }
}

fn format_time(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Pnl(v) => format!("{}", v),
        // Range multiples are reported to 3 decimals.
        Outcome::RangeMultiple(v) => format!("{:.3}", v),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_trades(&self, result: &BacktestResult, output_path: &Path) -> Result<(), OrbError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| OrbError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;

        wtr.write_record([
            "session_day",
            "entry_time",
            "entry_signal",
            "entry_price",
            "exit_time",
            "exit_price",
            "exit_reason",
            self.outcome_column(),
        ])
        .map_err(|e| OrbError::Data {
            reason: format!("CSV write error: {}", e),
        })?;

        for trade in &result.trades {
            wtr.write_record([
                trade.session.to_string(),
                format_time(trade.entry_time),
                trade.entry_signal.to_string(),
                trade.entry_price.to_string(),
                format_time(trade.exit_time),
                trade.exit_price.to_string(),
                trade.exit_reason.to_string(),
                format_outcome(&trade.outcome),
            ])
            .map_err(|e| OrbError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn write_signals(&self, result: &BacktestResult, output_path: &Path) -> Result<(), OrbError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| OrbError::Data {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;

        wtr.write_record(["timestamp", "signal", "orh", "orl"])
            .map_err(|e| OrbError::Data {
                reason: format!("CSV write error: {}", e),
            })?;

        for session in &result.sessions {
            let (orh, orl) = match session.range {
                Some(r) => (r.orh.to_string(), r.orl.to_string()),
                None => (String::new(), String::new()),
            };
            for (timestamp, signal) in &session.signals {
                wtr.write_record([
                    format_time(*timestamp),
                    signal.to_string(),
                    orh.clone(),
                    orl.clone(),
                ])
                .map_err(|e| OrbError::Data {
                    reason: format!("CSV write error: {}", e),
                })?;
            }
        }

        wtr.flush()?;
        Ok(())
    }
}
