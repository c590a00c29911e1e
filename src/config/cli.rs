use crate::config::toml_config::WatchConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "slot-notifier")]
#[command(about = "Polls the appointment API and reports free vaccination slots")]
pub struct CliConfig {
    /// Path to TOML configuration file (built-in location list when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    /// Phone number to authenticate with (prompted when omitted)
    #[arg(long)]
    pub phone: Option<String>,

    /// Override polling.interval_seconds from config
    #[arg(long)]
    pub interval: Option<u64>,

    /// Also send desktop notifications
    #[arg(long)]
    pub desktop_notify: bool,

    /// Run a single polling round and exit
    #[arg(long)]
    pub once: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Authenticate and poll for available slots (default)
    Watch,
    /// List states and their ids
    States,
    /// List the districts of a state
    Districts {
        /// State id as printed by `states`
        state_id: u64,
    },
}

impl CliConfig {
    /// 載入設定檔並套用命令列覆蓋設定
    pub fn load_watch_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                WatchConfig::from_file(path)?
            }
            None => {
                tracing::info!("📁 No configuration file given, using built-in location list");
                WatchConfig::default()
            }
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut WatchConfig) {
        if let Some(interval) = self.interval {
            config.polling.interval_seconds = Some(interval);
            tracing::info!("🔧 Polling interval overridden to: {}s", interval);
        }
        if self.desktop_notify {
            config.notifications.desktop = true;
        }
        if self.once {
            config.polling.max_rounds = Some(1);
        }
    }
}
