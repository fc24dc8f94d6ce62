//! Finalized trade records.

use chrono::NaiveDateTime;
use std::fmt;

use super::session::SessionId;
use super::signal::Direction;

/// What terminated a trade's forward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    OppositeSignal,
    DayEnd,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TakeProfit => "TAKE_PROFIT",
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::OppositeSignal => "OPPOSITE_SIGNAL",
            ExitReason::DayEnd => "DAY_END",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome metric carried by a trade. Which variant appears is a run-level
/// configuration, never mixed within one result set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Signed price difference: `exit - entry` for Buy, negated for Sell.
    Pnl(f64),
    /// Favorable excursion between entry and exit, in opening-range widths.
    RangeMultiple(f64),
}

impl Outcome {
    pub fn value(&self) -> f64 {
        match self {
            Outcome::Pnl(v) | Outcome::RangeMultiple(v) => *v,
        }
    }
}

/// Immutable once produced by the simulator. Entry and exit always lie in
/// the same session, with `entry_time < exit_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub session: SessionId,
    pub entry_time: NaiveDateTime,
    pub entry_signal: Direction,
    pub entry_price: f64,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    pub outcome: Outcome,
}
