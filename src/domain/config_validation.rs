//! Configuration validation.
//!
//! Validates all recognized config fields before a backtest runs, so bad
//! input fails fast with a precise section/key instead of partway through
//! the pipeline.

use crate::domain::error::OrbError;
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, NaiveTime};

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), OrbError> {
    validate_data_path(config)?;
    validate_session_offset(config)?;
    validate_date_range(config)?;
    validate_orb_window(config)?;
    validate_signal_policy(config)?;
    validate_exit_policy(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), OrbError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(OrbError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_session_offset(config: &dyn ConfigPort) -> Result<(), OrbError> {
    let minutes = config.get_int("session", "offset_minutes", 0);
    if !(0..24 * 60).contains(&minutes) {
        return Err(OrbError::ConfigInvalid {
            section: "session".to_string(),
            key: "offset_minutes".to_string(),
            reason: "offset_minutes must be in [0, 1440)".to_string(),
        });
    }
    Ok(())
}

fn validate_date_range(config: &dyn ConfigPort) -> Result<(), OrbError> {
    let start = config.get_string("session", "start_date");
    let end = config.get_string("session", "end_date");

    // Both optional, but if one is given both must be, and ordered.
    match (start.as_deref(), end.as_deref()) {
        (None, None) => Ok(()),
        (Some(s), Some(e)) => {
            let start_date = parse_date(s, "start_date")?;
            let end_date = parse_date(e, "end_date")?;
            if start_date > end_date {
                return Err(OrbError::ConfigInvalid {
                    section: "session".to_string(),
                    key: "start_date".to_string(),
                    reason: "start_date must not be after end_date".to_string(),
                });
            }
            Ok(())
        }
        (Some(_), None) => Err(OrbError::ConfigMissing {
            section: "session".to_string(),
            key: "end_date".to_string(),
        }),
        (None, Some(_)) => Err(OrbError::ConfigMissing {
            section: "session".to_string(),
            key: "start_date".to_string(),
        }),
    }
}

fn validate_orb_window(config: &dyn ConfigPort) -> Result<(), OrbError> {
    for key in ["window_start", "window_end"] {
        match config.get_string("orb", key) {
            None => {
                return Err(OrbError::ConfigMissing {
                    section: "orb".to_string(),
                    key: key.to_string(),
                });
            }
            Some(s) => {
                parse_time_of_day(&s, key)?;
            }
        }
    }
    Ok(())
}

fn validate_signal_policy(config: &dyn ConfigPort) -> Result<(), OrbError> {
    match config.get_string("signal", "policy").as_deref() {
        None | Some("breakout") | Some("breakout_flip") => Ok(()),
        Some(other) => Err(OrbError::ConfigInvalid {
            section: "signal".to_string(),
            key: "policy".to_string(),
            reason: format!("unknown policy '{}', expected breakout or breakout_flip", other),
        }),
    }
}

fn validate_exit_policy(config: &dyn ConfigPort) -> Result<(), OrbError> {
    for key in ["take_profit", "stop_loss"] {
        if let Some(s) = config.get_string("exit", key) {
            let value: f64 = s.parse().map_err(|_| OrbError::ConfigInvalid {
                section: "exit".to_string(),
                key: key.to_string(),
                reason: format!("{} must be a number", key),
            })?;
            if value <= 0.0 {
                return Err(OrbError::ConfigInvalid {
                    section: "exit".to_string(),
                    key: key.to_string(),
                    reason: format!("{} must be positive", key),
                });
            }
        }
    }
    match config.get_string("exit", "metric").as_deref() {
        None | Some("pnl") | Some("range_multiple") => Ok(()),
        Some(other) => Err(OrbError::ConfigInvalid {
            section: "exit".to_string(),
            key: "metric".to_string(),
            reason: format!("unknown metric '{}', expected pnl or range_multiple", other),
        }),
    }
}

/// `YYYY-MM-DD`, used for the `[session]` date range.
pub fn parse_date(value: &str, key: &str) -> Result<NaiveDate, OrbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| OrbError::ConfigInvalid {
        section: "session".to_string(),
        key: key.to_string(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", key),
    })
}

/// `HH:MM` or `HH:MM:SS`, used for the `[orb]` window bounds.
pub fn parse_time_of_day(value: &str, key: &str) -> Result<NaiveTime, OrbError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| OrbError::ConfigInvalid {
            section: "orb".to_string(),
            key: key.to_string(),
            reason: format!("invalid {} format, expected HH:MM", key),
        })
}
