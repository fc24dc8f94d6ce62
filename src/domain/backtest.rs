//! Backtest orchestration.
//!
//! Wires the per-session pipeline together: date filter → segmentation →
//! (opening range → signals → trades) per session. Sessions are fully
//! independent, so they run as a parallel map; results are re-sorted so the
//! output is deterministic regardless of scheduling.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rayon::prelude::*;

use super::bar::Bar;
use super::error::OrbError;
use super::range::{self, OpeningRange, OrbWindow};
use super::session::{self, Session, SessionId};
use super::signal::{self, Signal, SignalPolicy};
use super::simulator::{self, ExitPolicy};
use super::trade::Trade;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub session_offset: Duration,
    pub orb_window: OrbWindow,
    pub signal_policy: SignalPolicy,
    pub exit_policy: ExitPolicy,
    /// Inclusive calendar-date filter on raw timestamps, applied before
    /// segmentation.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Everything computed for one session. Sessions without a usable opening
/// range keep an all-HOLD signal series and zero trades; they are never an
/// error.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub id: SessionId,
    pub range: Option<OpeningRange>,
    /// Per-bar signal series, for signal overlays alongside ORH/ORL.
    pub signals: Vec<(NaiveDateTime, Signal)>,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    /// Per-session detail, ordered by session id.
    pub sessions: Vec<SessionResult>,
    /// Flat trade sequence across all sessions, ordered by entry time.
    pub trades: Vec<Trade>,
}

/// Run the full pipeline over a raw bar stream.
///
/// The only hard failure is an input that leaves no bars after date
/// filtering and malformed-bar removal. Sessions that cannot trade
/// (no opening-range bars, degenerate range, no breakout) contribute
/// zero trades and are otherwise reported as-is.
pub fn run_backtest(bars: &[Bar], config: &BacktestConfig) -> Result<BacktestResult, OrbError> {
    let filtered: Vec<Bar> = match config.date_range {
        Some((start, end)) => bars
            .iter()
            .filter(|b| {
                let date = b.timestamp.date();
                start <= date && date <= end
            })
            .cloned()
            .collect(),
        None => bars.to_vec(),
    };

    let sessions = session::segment(&filtered, config.session_offset);
    if sessions.is_empty() {
        return Err(OrbError::EmptyInput);
    }

    let mut session_results: Vec<SessionResult> = sessions
        .into_par_iter()
        .map(|s| run_session(s, config))
        .collect();
    session_results.sort_by_key(|r| r.id);

    let mut trades: Vec<Trade> = session_results
        .iter()
        .flat_map(|r| r.trades.iter().cloned())
        .collect();
    trades.sort_by_key(|t| t.entry_time);

    Ok(BacktestResult {
        sessions: session_results,
        trades,
    })
}

fn run_session(session: Session, config: &BacktestConfig) -> SessionResult {
    let range = range::opening_range(&session.bars, &config.orb_window);

    let (signals, trades) = match range {
        Some(r) if !r.is_degenerate() => {
            let signals = signal::generate_signals(&session.bars, &r, config.signal_policy);
            let trades = simulator::simulate_session(&session, &signals, &r, &config.exit_policy);
            (signals, trades)
        }
        _ => (vec![Signal::Hold; session.bars.len()], Vec::new()),
    };

    SessionResult {
        id: session.id,
        range,
        signals: session
            .bars
            .iter()
            .map(|b| b.timestamp)
            .zip(signals)
            .collect(),
        trades,
    }
}
