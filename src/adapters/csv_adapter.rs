//! CSV bar file adapter.
//!
//! Reads an OHLC bar series from a single CSV file. The timestamp column is
//! either `date`/`timestamp` (datetime strings) or `open_time` (epoch
//! milliseconds, as in Binance kline exports). Shape violations such as
//! `low > high` are passed through; the domain core drops them.

use crate::domain::bar::Bar;
use crate::domain::error::OrbError;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDateTime};
use std::path::PathBuf;

pub struct CsvBarAdapter {
    path: PathBuf,
}

impl CsvBarAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

enum TimestampKind {
    DateTime,
    EpochMillis,
}

struct Columns {
    timestamp: usize,
    kind: TimestampKind,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, OrbError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let (timestamp, kind) = if let Some(i) = find("date").or_else(|| find("timestamp")) {
        (i, TimestampKind::DateTime)
    } else if let Some(i) = find("open_time") {
        (i, TimestampKind::EpochMillis)
    } else {
        return Err(OrbError::Data {
            reason: "no date, timestamp or open_time column".into(),
        });
    };

    let price = |name: &str| {
        find(name).ok_or_else(|| OrbError::Data {
            reason: format!("missing {} column", name),
        })
    };

    Ok(Columns {
        timestamp,
        kind,
        open: price("open")?,
        high: price("high")?,
        low: price("low")?,
        close: price("close")?,
    })
}

fn parse_timestamp(value: &str, kind: &TimestampKind) -> Result<NaiveDateTime, OrbError> {
    match kind {
        TimestampKind::DateTime => NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| OrbError::Data {
                reason: format!("invalid timestamp '{}': {}", value, e),
            }),
        TimestampKind::EpochMillis => {
            let millis: i64 = value.parse().map_err(|_| OrbError::Data {
                reason: format!("invalid epoch milliseconds '{}'", value),
            })?;
            DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| OrbError::Data {
                    reason: format!("epoch milliseconds out of range: {}", millis),
                })
        }
    }
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, OrbError> {
    record
        .get(index)
        .ok_or_else(|| OrbError::Data {
            reason: format!("missing {} field", name),
        })?
        .trim()
        .parse()
        .map_err(|e| OrbError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvBarAdapter {
    fn fetch_bars(&self) -> Result<Vec<Bar>, OrbError> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| OrbError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let columns = resolve_columns(rdr.headers().map_err(|e| OrbError::Data {
            reason: format!("CSV header error: {}", e),
        })?)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| OrbError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_field = record.get(columns.timestamp).ok_or_else(|| OrbError::Data {
                reason: "missing timestamp field".into(),
            })?;

            bars.push(Bar {
                timestamp: parse_timestamp(ts_field.trim(), &columns.kind)?,
                open: parse_price(&record, columns.open, "open")?,
                high: parse_price(&record, columns.high, "high")?,
                low: parse_price(&record, columns.low, "low")?,
                close: parse_price(&record, columns.close, "close")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn fetch_bars_datetime_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bars.csv",
            "date,open,high,low,close,volume\n\
             2025-01-15 13:00:00,100.0,101.0,99.0,100.5,1200\n\
             2025-01-15 13:15:00,100.5,102.0,100.0,101.5,900\n",
        );
        let bars = CsvBarAdapter::new(path).fetch_bars().unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0].timestamp,
            NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap()
        );
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[1].close, 101.5);
    }

    #[test]
    fn fetch_bars_epoch_millis_column() {
        // 2025-01-01 00:00:00 UTC = 1735689600000 ms
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "klines.csv",
            "open_time,open,high,low,close\n\
             1735689600000,93000.0,93100.0,92900.0,93050.0\n",
        );
        let bars = CsvBarAdapter::new(path).fetch_bars().unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(
            bars[0].timestamp,
            NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn bars_sorted_on_load() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bars.csv",
            "date,open,high,low,close\n\
             2025-01-15 14:00:00,1.0,2.0,0.5,1.5\n\
             2025-01-15 13:00:00,1.0,2.0,0.5,1.5\n",
        );
        let bars = CsvBarAdapter::new(path).fetch_bars().unwrap();
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn missing_file_is_error() {
        let adapter = CsvBarAdapter::new(PathBuf::from("/nonexistent/bars.csv"));
        assert!(adapter.fetch_bars().is_err());
    }

    #[test]
    fn missing_price_column_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "bars.csv", "date,open,high,low\n");
        let err = CsvBarAdapter::new(path).fetch_bars().unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn unparseable_price_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bars.csv",
            "date,open,high,low,close\n2025-01-15 13:00:00,abc,2.0,0.5,1.5\n",
        );
        assert!(CsvBarAdapter::new(path).fetch_bars().is_err());
    }

    #[test]
    fn data_range_reports_span() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "bars.csv",
            "date,open,high,low,close\n\
             2025-01-15 13:00:00,1.0,2.0,0.5,1.5\n\
             2025-01-16 13:00:00,1.0,2.0,0.5,1.5\n",
        );
        let (first, last, count) = CsvBarAdapter::new(path).data_range().unwrap().unwrap();
        assert_eq!(count, 2);
        assert!(first < last);
    }

    #[test]
    fn data_range_empty_source() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "bars.csv", "date,open,high,low,close\n");
        assert!(CsvBarAdapter::new(path).data_range().unwrap().is_none());
    }
}
