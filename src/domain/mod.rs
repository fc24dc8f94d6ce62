//! Core domain types and logic.

pub mod bar;
pub mod session;
pub mod range;
pub mod signal;
pub mod trade;
pub mod simulator;
pub mod backtest;
pub mod config_validation;
pub mod error;
