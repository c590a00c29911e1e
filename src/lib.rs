pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use adapters::http::AppointmentClient;
pub use config::WatchConfig;
pub use crate::core::{filter::filter_available_sessions, poller::PollingNotifier};
pub use utils::error::{Result, WatchError};
