use clap::Parser;
use slot_notifier::adapters::notify::notifiers_from_config;
use slot_notifier::adapters::prompt::StdinPrompt;
use slot_notifier::utils::error::ErrorSeverity;
use slot_notifier::utils::{logger, validation::Validate};
use slot_notifier::{AppointmentClient, CliCommand, CliConfig, PollingNotifier, WatchError};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting slot-notifier");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ slot-notifier failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<(), WatchError> {
    // 載入並驗證配置，任何網路請求之前完成
    let config = cli.load_watch_config()?;
    config.validate()?;
    tracing::info!(
        "✅ Configuration loaded: {} locations, every {:?}",
        config.locations.len(),
        config.polling.interval()
    );

    let client = AppointmentClient::new(&config.api)?;

    match cli.command.clone().unwrap_or(CliCommand::Watch) {
        CliCommand::States => {
            for state in client.list_states().await? {
                println!("{:>4}  {}", state.state_id, state.state_name);
            }
            Ok(())
        }
        CliCommand::Districts { state_id } => {
            for district in client.list_districts(state_id).await? {
                println!("{:>4}  {}", district.district_id, district.district_name);
            }
            Ok(())
        }
        CliCommand::Watch => {
            let targets = config.targets()?;
            for target in &targets {
                tracing::info!(
                    "📍 {} ({:?} {}) age {}",
                    target.name,
                    target.kind,
                    target.id,
                    target.min_age
                );
            }

            let poller = PollingNotifier::new(client, targets, config.polling.interval())
                .with_notifiers(notifiers_from_config(&config.notifications))
                .with_max_rounds(config.polling.max_rounds);

            tokio::select! {
                result = poller.watch(&StdinPrompt, cli.phone.as_deref()) => {
                    let reports = result?;
                    let matches: usize = reports.iter().map(|r| r.matches).sum();
                    println!("✅ Finished {} round(s), {} slot(s) found", reports.len(), matches);
                    Ok(())
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("🛑 Interrupted, shutting down");
                    // 提示中的 stdin 讀取無法取消，等待 runtime 關閉會卡住
                    std::process::exit(0);
                }
            }
        }
    }
}
