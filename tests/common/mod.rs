#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveTime};
use orbtest::domain::backtest::BacktestConfig;
use orbtest::domain::bar::Bar;
use orbtest::domain::error::OrbError;
use orbtest::domain::range::OrbWindow;
use orbtest::domain::signal::SignalPolicy;
use orbtest::domain::simulator::ExitPolicy;
use orbtest::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<Bar>, OrbError> {
        if let Some(reason) = &self.error {
            return Err(OrbError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }
}

pub fn bar(d: u32, h: u32, m: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        timestamp: NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap(),
        open,
        high,
        low,
        close,
    }
}

/// Config with a 09:00-09:30 opening-range window, no offset, default exit
/// policy (opposite-signal exit only, pnl metric).
pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        session_offset: Duration::zero(),
        orb_window: OrbWindow {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        },
        signal_policy: SignalPolicy::BreakoutWithFlip,
        exit_policy: ExitPolicy::default(),
        date_range: None,
    }
}

/// Bars establishing an opening range of 90..100 for day `d`.
pub fn opening_range_bars(d: u32) -> Vec<Bar> {
    vec![
        bar(d, 9, 0, 95.0, 100.0, 90.0, 96.0),
        bar(d, 9, 30, 96.0, 99.0, 94.0, 97.0),
    ]
}
