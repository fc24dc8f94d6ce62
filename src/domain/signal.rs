//! Breakout signal engine.
//!
//! Walks one session's bars in order, holding the last emitted direction in
//! an explicit [`SignalState`]. A bar emits `Buy`/`Sell` only when the rule
//! set produces a *different* direction than the current state; everything
//! else is `Hold`. That hysteresis means at most one actionable signal per
//! direction change — a persisting trend never re-triggers.

use std::fmt;

use super::bar::Bar;
use super::range::OpeningRange;

/// Trade direction of an actionable signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-bar signal emission. `Hold` is "no state change" and never creates
/// a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }

    /// The direction of an actionable signal, `None` for `Hold`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::Buy => Some(Direction::Buy),
            Signal::Sell => Some(Direction::Sell),
            Signal::Hold => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Direction> for Signal {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Signal::Buy,
            Direction::Sell => Signal::Sell,
        }
    }
}

/// Which rule set governs signal emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalPolicy {
    /// Breakout entries only: close crossing beyond the band from an open
    /// on the near side.
    Breakout,
    /// Breakout entries plus continuation flips: an established Buy flips
    /// to Sell when the close drops below ORL, and vice versa.
    #[default]
    BreakoutWithFlip,
}

/// Last emitted direction within one session. Neutral at session start;
/// never crosses a session boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalState {
    pub last: Option<Direction>,
}

impl SignalState {
    /// Evaluate one bar against the opening range and advance the state.
    ///
    /// Returns the emitted signal: `Buy`/`Sell` on a state change, `Hold`
    /// otherwise.
    pub fn step(&mut self, bar: &Bar, range: &OpeningRange, policy: SignalPolicy) -> Signal {
        let mut candidate = self.last;

        if bar.open <= range.orh && bar.close > range.orh {
            candidate = Some(Direction::Buy);
        } else if bar.open >= range.orl && bar.close < range.orl {
            candidate = Some(Direction::Sell);
        } else if policy == SignalPolicy::BreakoutWithFlip {
            match self.last {
                Some(Direction::Buy) if bar.close < range.orl => {
                    candidate = Some(Direction::Sell);
                }
                Some(Direction::Sell) if bar.close > range.orh => {
                    candidate = Some(Direction::Buy);
                }
                _ => {}
            }
        }

        match candidate {
            Some(direction) if candidate != self.last => {
                self.last = Some(direction);
                direction.into()
            }
            _ => Signal::Hold,
        }
    }
}

/// One signal per bar for a whole session.
pub fn generate_signals(bars: &[Bar], range: &OpeningRange, policy: SignalPolicy) -> Vec<Signal> {
    let mut state = SignalState::default();
    bars.iter()
        .map(|bar| state.step(bar, range, policy))
        .collect()
}
