//! A client for recording expenses in a remote expense store and deriving spending summaries from
//! them: category totals, net-of-reimbursement figures, per-period breakdowns and chart series.

pub mod aggregate;
mod api;
pub mod args;
pub mod chart;
pub mod commands;
mod config;
mod error;
mod ledger;
pub mod model;
pub mod period;
mod utils;


pub use api::{store, Mode, Store};
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
