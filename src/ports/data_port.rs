//! Bar acquisition port trait.

use crate::domain::bar::Bar;
use crate::domain::error::OrbError;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Fetch the full bar stream, chronologically ordered.
    fn fetch_bars(&self) -> Result<Vec<Bar>, OrbError>;

    /// `(first timestamp, last timestamp, bar count)`, or `None` when the
    /// source is empty.
    fn data_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, OrbError> {
        let bars = self.fetch_bars()?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, bars.len())),
            _ => None,
        })
    }
}
