//! Trade-exit simulation.
//!
//! For every actionable signal in a session, scans the strictly subsequent
//! bars for the first qualifying exit event. Precedence within the scan:
//! take-profit, stop-loss, opposite signal, then session end as fallback.
//! Entries are independent — a prior open trade never blocks a later entry
//! in the same session.

use super::bar::Bar;
use super::range::OpeningRange;
use super::session::Session;
use super::signal::{Direction, Signal};
use super::trade::{ExitReason, Outcome, Trade};

/// Which outcome metric trades carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutcomeMetric {
    #[default]
    Pnl,
    /// Favorable excursion divided by opening-range width (`max_levels`).
    RangeMultiple,
}

/// Exit rules applied to every trade of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPolicy {
    /// Absolute price offset from entry; `None` disables the take-profit leg.
    pub take_profit: Option<f64>,
    /// Absolute price offset from entry; `None` disables the stop-loss leg.
    pub stop_loss: Option<f64>,
    pub exit_on_opposite: bool,
    pub metric: OutcomeMetric,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        ExitPolicy {
            take_profit: None,
            stop_loss: None,
            exit_on_opposite: true,
            metric: OutcomeMetric::Pnl,
        }
    }
}

struct Exit {
    index: usize,
    price: f64,
    reason: ExitReason,
}

/// Simulate all entries of one session.
///
/// `signals` must be the per-bar sequence for `session.bars`. An entry on
/// the session's final bar has no forward path and produces no trade.
pub fn simulate_session(
    session: &Session,
    signals: &[Signal],
    range: &OpeningRange,
    policy: &ExitPolicy,
) -> Vec<Trade> {
    debug_assert_eq!(session.bars.len(), signals.len());

    let bars = &session.bars;
    let mut trades = Vec::new();

    for (entry_idx, signal) in signals.iter().enumerate() {
        let Some(direction) = signal.direction() else {
            continue;
        };
        if entry_idx + 1 >= bars.len() {
            continue;
        }

        let entry_price = bars[entry_idx].close;
        let exit = scan_exit(bars, signals, entry_idx, direction, entry_price, policy);

        let outcome = match policy.metric {
            OutcomeMetric::Pnl => {
                let diff = exit.price - entry_price;
                Outcome::Pnl(match direction {
                    Direction::Buy => diff,
                    Direction::Sell => -diff,
                })
            }
            OutcomeMetric::RangeMultiple => {
                // Excursion window runs from the entry bar through the exit
                // bar inclusive.
                let slice = &bars[entry_idx..=exit.index];
                let excursion = match direction {
                    Direction::Buy => {
                        let max_high = slice.iter().map(|b| b.high).fold(f64::MIN, f64::max);
                        max_high - entry_price
                    }
                    Direction::Sell => {
                        let min_low = slice.iter().map(|b| b.low).fold(f64::MAX, f64::min);
                        entry_price - min_low
                    }
                };
                Outcome::RangeMultiple(excursion / range.width())
            }
        };

        trades.push(Trade {
            session: session.id,
            entry_time: bars[entry_idx].timestamp,
            entry_signal: direction,
            entry_price,
            exit_time: bars[exit.index].timestamp,
            exit_price: exit.price,
            exit_reason: exit.reason,
            outcome,
        });
    }

    trades
}

fn scan_exit(
    bars: &[Bar],
    signals: &[Signal],
    entry_idx: usize,
    direction: Direction,
    entry_price: f64,
    policy: &ExitPolicy,
) -> Exit {
    let tp_level = policy.take_profit.map(|offset| match direction {
        Direction::Buy => entry_price + offset,
        Direction::Sell => entry_price - offset,
    });
    let sl_level = policy.stop_loss.map(|offset| match direction {
        Direction::Buy => entry_price - offset,
        Direction::Sell => entry_price + offset,
    });
    let opposite = direction.opposite();

    for (index, bar) in bars.iter().enumerate().skip(entry_idx + 1) {
        if let Some(tp) = tp_level {
            let hit = match direction {
                Direction::Buy => bar.close >= tp,
                Direction::Sell => bar.close <= tp,
            };
            if hit {
                return Exit {
                    index,
                    price: bar.close,
                    reason: ExitReason::TakeProfit,
                };
            }
        }

        if let Some(sl) = sl_level {
            let hit = match direction {
                Direction::Buy => bar.low <= sl,
                Direction::Sell => bar.high >= sl,
            };
            if hit {
                // Exit at the stop level itself, not the bar's traded price.
                return Exit {
                    index,
                    price: sl,
                    reason: ExitReason::StopLoss,
                };
            }
        }

        if policy.exit_on_opposite && signals[index].direction() == Some(opposite) {
            return Exit {
                index,
                price: bar.close,
                reason: ExitReason::OppositeSignal,
            };
        }
    }

    let last = bars.len() - 1;
    Exit {
        index: last,
        price: bars[last].close,
        reason: ExitReason::DayEnd,
    }
}
