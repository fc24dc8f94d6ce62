//! CLI definition and dispatch.

use chrono::Duration;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvBarAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self, BacktestConfig};
use crate::domain::config_validation::{parse_date, parse_time_of_day, validate_backtest_config};
use crate::domain::error::OrbError;
use crate::domain::range::OrbWindow;
use crate::domain::signal::SignalPolicy;
use crate::domain::simulator::{ExitPolicy, OutcomeMetric};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "orbtest", about = "Opening-range-breakout backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Trade report destination, overrides [report] output
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate config and data without simulating
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a backtest configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range of the configured bar file
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            dry_run,
        } => run_backtest(&config, output.as_deref(), dry_run),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = OrbError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble a [`BacktestConfig`] from a validated config source.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, OrbError> {
    let offset_minutes = adapter.get_int("session", "offset_minutes", 0);

    let window_start = adapter.get_string("orb", "window_start").ok_or_else(|| {
        OrbError::ConfigMissing {
            section: "orb".into(),
            key: "window_start".into(),
        }
    })?;
    let window_end =
        adapter
            .get_string("orb", "window_end")
            .ok_or_else(|| OrbError::ConfigMissing {
                section: "orb".into(),
                key: "window_end".into(),
            })?;

    let signal_policy = match adapter.get_string("signal", "policy").as_deref() {
        None | Some("breakout_flip") => SignalPolicy::BreakoutWithFlip,
        Some("breakout") => SignalPolicy::Breakout,
        Some(other) => {
            return Err(OrbError::ConfigInvalid {
                section: "signal".into(),
                key: "policy".into(),
                reason: format!("unknown policy '{}'", other),
            });
        }
    };

    let metric = match adapter.get_string("exit", "metric").as_deref() {
        None | Some("pnl") => OutcomeMetric::Pnl,
        Some("range_multiple") => OutcomeMetric::RangeMultiple,
        Some(other) => {
            return Err(OrbError::ConfigInvalid {
                section: "exit".into(),
                key: "metric".into(),
                reason: format!("unknown metric '{}'", other),
            });
        }
    };

    let exit_offset = |key: &str| -> Result<Option<f64>, OrbError> {
        match adapter.get_string("exit", key) {
            None => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| OrbError::ConfigInvalid {
                section: "exit".into(),
                key: key.into(),
                reason: format!("{} must be a number", key),
            }),
        }
    };

    let date_range = match (
        adapter.get_string("session", "start_date"),
        adapter.get_string("session", "end_date"),
    ) {
        (Some(s), Some(e)) => Some((parse_date(&s, "start_date")?, parse_date(&e, "end_date")?)),
        _ => None,
    };

    Ok(BacktestConfig {
        session_offset: Duration::minutes(offset_minutes),
        orb_window: OrbWindow {
            start: parse_time_of_day(&window_start, "window_start")?,
            end: parse_time_of_day(&window_end, "window_end")?,
        },
        signal_policy,
        exit_policy: ExitPolicy {
            take_profit: exit_offset("take_profit")?,
            stop_loss: exit_offset("stop_loss")?,
            exit_on_opposite: adapter.get_bool("exit", "on_opposite_signal", true),
            metric,
        },
        date_range,
    })
}

fn run_backtest(config_path: &Path, output_override: Option<&Path>, dry_run: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let Some(data_path) = adapter.get_string("data", "path") else {
        let err = OrbError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    };
    eprintln!("Loading bars from {}", data_path);
    let data_port = CsvBarAdapter::new(PathBuf::from(&data_path));
    let bars = match data_port.fetch_bars() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} bars", bars.len());

    if dry_run {
        eprintln!("Dry run: config and data OK");
        return ExitCode::SUCCESS;
    }

    let result = match backtest::run_backtest(&bars, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Simulated {} sessions, {} trades",
        result.sessions.len(),
        result.trades.len()
    );

    let output_path = output_override.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("report", "output")
                .unwrap_or_else(|| "trades.csv".to_string()),
        )
    });

    let report = CsvReportAdapter::new(bt_config.exit_policy.metric);
    if let Err(e) = report.write_trades(&result, &output_path) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Wrote {} trades to {}", result.trades.len(), output_path.display());

    if let Some(signals_path) = adapter.get_string("report", "signals_output") {
        let signals_path = PathBuf::from(signals_path);
        if let Err(e) = report.write_signals(&result, &signals_path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Wrote signal series to {}", signals_path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_backtest_config(&adapter).and_then(|_| build_backtest_config(&adapter)) {
        Ok(_) => {
            println!("Config OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match adapter.get_string("data", "path") {
        Some(p) => p,
        None => {
            let err = OrbError::ConfigMissing {
                section: "data".into(),
                key: "path".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let data_port = CsvBarAdapter::new(PathBuf::from(&data_path));
    match data_port.data_range() {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} .. {}", data_path, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("{}: no bars", data_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
