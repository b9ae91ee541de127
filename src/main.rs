mod commands;
mod dialog;
mod gateway;
mod messages;

#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use gateway::reminders::{ReminderJob, RunOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use taskbot_channels::telegram::TelegramChannel;
use taskbot_core::{
    config::{self, Config, ConfigSource, TelegramConfig},
    dialog::InMemoryDialogStore,
    shellexpand,
};
use taskbot_memory::Store;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "taskbot",
    version,
    about = "Task and habit tracker for Telegram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show configuration and database counts.
    Status,
    /// Send today's deadline reminders once and exit.
    Remind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (cfg, source) = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg);
    if source == ConfigSource::Defaults {
        info!("Config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Start => {
            let tg = telegram_config(&cfg)?;
            let channel = TelegramChannel::new(tg).with_commands(commands::MENU.iter().copied());
            let store = Store::new(&cfg.memory).await?;

            println!("{} — starting...", cfg.taskbot.name);
            let gw = gateway::Gateway::new(
                Arc::new(channel),
                store,
                Arc::new(InMemoryDialogStore::new()),
                cfg.reminders.clone(),
            );
            Arc::new(gw).run().await?;
        }
        Commands::Status => {
            println!("{} — status\n", cfg.taskbot.name);
            println!("Config: {}", cli.config);
            println!("Database: {}", shellexpand(&cfg.memory.db_path));

            match cfg.channel.telegram {
                Some(ref tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }

            if cfg.reminders.enabled {
                let at = cfg.reminders.fire_time()?;
                println!("  reminders: daily at {}", at.format("%H:%M"));
            } else {
                println!("  reminders: disabled");
            }
            println!();

            let store = Store::new(&cfg.memory).await?;
            let counts = store.counts().await?;
            println!("  users: {}", counts.users);
            println!("  pending tasks: {}", counts.pending_tasks);
            println!("  habits: {}", counts.habits);
        }
        Commands::Remind => {
            let tg = telegram_config(&cfg)?;
            let store = Store::new(&cfg.memory).await?;
            let job = ReminderJob::new(store, Arc::new(TelegramChannel::new(tg)));

            let today = chrono::Local::now().date_naive();
            match job.run(today).await? {
                RunOutcome::Completed(report) => println!(
                    "Reminders for {today}: {} sent, {} failed",
                    report.sent, report.failed
                ),
                RunOutcome::Skipped => println!("A reminder run is already in progress."),
            }
        }
    }

    Ok(())
}

/// The Telegram section, if enabled and carrying a token.
fn telegram_config(cfg: &Config) -> anyhow::Result<TelegramConfig> {
    let Some(tg) = cfg.channel.telegram.as_ref().filter(|tg| tg.enabled) else {
        anyhow::bail!("Telegram is not enabled. Enable [channel.telegram] in config.toml.");
    };
    if tg.bot_token.is_empty() {
        anyhow::bail!(
            "Telegram is enabled but bot_token is empty. \
             Set it in config.toml or the {} env var.",
            config::BOT_TOKEN_ENV
        );
    }
    Ok(tg.clone())
}

/// Log to stdout and to a daily-rolling file under `{data_dir}/logs`.
///
/// `RUST_LOG` overrides the configured level. Falls back to stdout only if
/// the log directory can't be created.
fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.taskbot.log_level));
    let stdout = tracing_subscriber::fmt::layer();

    let log_dir = PathBuf::from(shellexpand(&cfg.taskbot.data_dir)).join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout)
            .init();
        warn!("file logging disabled, can't create {}: {e}", log_dir.display());
        return None;
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "taskbot.log"));
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();
    Some(guard)
}
