//! Intraday OHLC bar representation.

use chrono::{NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// All prices finite and `low <= min(open, close) <= max(open, close) <= high`.
    ///
    /// Bars failing this check are dropped from session computation rather
    /// than aborting the run.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite();
        finite
            && self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
    }

    /// Time-of-day component, date ignored.
    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bar() -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
        }
    }

    #[test]
    fn well_formed_bar() {
        assert!(sample_bar().is_well_formed());
    }

    #[test]
    fn low_above_open_is_malformed() {
        let bar = Bar {
            low: 101.0,
            ..sample_bar()
        };
        assert!(!bar.is_well_formed());
    }

    #[test]
    fn high_below_close_is_malformed() {
        let bar = Bar {
            high: 104.0,
            ..sample_bar()
        };
        assert!(!bar.is_well_formed());
    }

    #[test]
    fn non_finite_price_is_malformed() {
        let bar = Bar {
            close: f64::NAN,
            ..sample_bar()
        };
        assert!(!bar.is_well_formed());
        let bar = Bar {
            high: f64::INFINITY,
            ..sample_bar()
        };
        assert!(!bar.is_well_formed());
    }

    #[test]
    fn zero_range_bar_is_well_formed() {
        let bar = Bar {
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            ..sample_bar()
        };
        assert!(bar.is_well_formed());
    }

    #[test]
    fn time_of_day_strips_date() {
        let bar = sample_bar();
        assert_eq!(
            bar.time_of_day(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap()
        );
    }
}
