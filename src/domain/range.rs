//! Opening-range calculation.
//!
//! The opening range is the high/low band over the bars whose time-of-day
//! falls inside a configured sampling window. It is the reference level
//! every breakout signal in the session is judged against.

use chrono::NaiveTime;

use super::bar::Bar;

/// Inclusive time-of-day window. A window with `start > end` wraps past
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OrbWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningRange {
    pub orh: f64,
    pub orl: f64,
}

impl OpeningRange {
    pub fn width(&self) -> f64 {
        self.orh - self.orl
    }

    /// Zero or inverted width. Degenerate sessions are skipped for trading
    /// so the range-multiple metric never divides by zero.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0
    }
}

/// ORH = max(high), ORL = min(low) over in-window bars; `None` when no bar
/// falls inside the window.
pub fn opening_range(bars: &[Bar], window: &OrbWindow) -> Option<OpeningRange> {
    let mut range: Option<OpeningRange> = None;

    for bar in bars {
        if !window.contains(bar.time_of_day()) {
            continue;
        }
        range = Some(match range {
            None => OpeningRange {
                orh: bar.high,
                orl: bar.low,
            },
            Some(r) => OpeningRange {
                orh: r.orh.max(bar.high),
                orl: r.orl.min(bar.low),
            },
        });
    }

    range
}
