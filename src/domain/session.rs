//! Session segmentation: mapping a continuous bar stream onto logical
//! trading days.
//!
//! A session id is the calendar date of `timestamp - session_offset`, so a
//! "day" can start at any clock time (e.g. a 12h offset makes sessions run
//! 12:00 → 12:00). Sessions never share bars and carry no state across
//! their boundary.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use super::bar::Bar;

/// Opaque, chronologically ordered session identifier.
pub type SessionId = NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub bars: Vec<Bar>,
}

/// Session id for a single timestamp.
pub fn session_id(timestamp: NaiveDateTime, offset: Duration) -> SessionId {
    (timestamp - offset).date()
}

/// Group bars into sessions ordered by id.
///
/// Malformed bars are dropped here so no downstream stage sees them. Each
/// group is re-sorted by timestamp; input order within a session is not
/// trusted after grouping.
pub fn segment(bars: &[Bar], offset: Duration) -> Vec<Session> {
    let mut groups: BTreeMap<SessionId, Vec<Bar>> = BTreeMap::new();

    for bar in bars {
        if !bar.is_well_formed() {
            continue;
        }
        groups
            .entry(session_id(bar.timestamp, offset))
            .or_default()
            .push(bar.clone());
    }

    groups
        .into_iter()
        .map(|(id, mut bars)| {
            bars.sort_by_key(|b| b.timestamp);
            Session { id, bars }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(y: i32, m: u32, d: u32, h: u32, min: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
        }
    }

    #[test]
    fn zero_offset_groups_by_calendar_date() {
        let bars = vec![
            bar_at(2025, 1, 1, 9, 0, 100.0),
            bar_at(2025, 1, 1, 23, 0, 101.0),
            bar_at(2025, 1, 2, 0, 0, 102.0),
        ];
        let sessions = segment(&bars, Duration::zero());
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(sessions[0].bars.len(), 2);
        assert_eq!(sessions[1].bars.len(), 1);
    }

    #[test]
    fn twelve_hour_offset_shifts_session_start() {
        // With a 12h offset, 2025-01-02 11:59 still belongs to 2025-01-01.
        let bars = vec![
            bar_at(2025, 1, 1, 13, 0, 100.0),
            bar_at(2025, 1, 2, 11, 59, 101.0),
            bar_at(2025, 1, 2, 12, 0, 102.0),
        ];
        let sessions = segment(&bars, Duration::hours(12));
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(sessions[0].bars.len(), 2);
        assert_eq!(sessions[1].id, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(sessions[1].bars.len(), 1);
    }

    #[test]
    fn bars_resorted_within_session() {
        let bars = vec![
            bar_at(2025, 1, 1, 15, 0, 101.0),
            bar_at(2025, 1, 1, 9, 0, 100.0),
            bar_at(2025, 1, 1, 12, 0, 103.0),
        ];
        let sessions = segment(&bars, Duration::zero());
        assert_eq!(sessions.len(), 1);
        let times: Vec<_> = sessions[0].bars.iter().map(|b| b.timestamp).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn malformed_bars_dropped() {
        let good = bar_at(2025, 1, 1, 9, 0, 100.0);
        let bad = Bar {
            low: 200.0,
            ..bar_at(2025, 1, 1, 9, 15, 100.0)
        };
        let sessions = segment(&[good, bad], Duration::zero());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].bars.len(), 1);
    }

    #[test]
    fn every_bar_in_exactly_one_session() {
        let bars: Vec<Bar> = (0..48)
            .map(|i| bar_at(2025, 1, 1 + (i / 24) as u32, (i % 24) as u32, 0, 100.0))
            .collect();
        let sessions = segment(&bars, Duration::hours(4));
        let total: usize = sessions.iter().map(|s| s.bars.len()).sum();
        assert_eq!(total, bars.len());
        for s in &sessions {
            for b in &s.bars {
                assert_eq!(session_id(b.timestamp, Duration::hours(4)), s.id);
            }
        }
    }

    #[test]
    fn empty_input_yields_no_sessions() {
        assert!(segment(&[], Duration::zero()).is_empty());
    }

    #[test]
    fn sessions_ordered_by_id() {
        let bars = vec![
            bar_at(2025, 1, 3, 9, 0, 100.0),
            bar_at(2025, 1, 1, 9, 0, 100.0),
            bar_at(2025, 1, 2, 9, 0, 100.0),
        ];
        let sessions = segment(&bars, Duration::zero());
        let ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
