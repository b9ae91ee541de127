mod channels;
mod defaults;


pub use channels::*;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TaskbotError;
use defaults::*;

/// Environment variable that overrides `channel.telegram.bot_token`.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level taskbot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub taskbot: TaskbotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskbotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TaskbotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Daily reminder configuration. The job fires once per day at
/// `hour:minute` local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reminder_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: default_reminder_hour(),
            minute: 0,
        }
    }
}

impl ReminderConfig {
    /// Wall-clock time the reminder job fires at.
    pub fn fire_time(&self) -> Result<NaiveTime, TaskbotError> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).ok_or_else(|| {
            TaskbotError::Config(format!(
                "invalid reminder time {:02}:{:02} (hour 0-23, minute 0-59)",
                self.hour, self.minute
            ))
        })
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Apply environment overrides on top of a parsed config.
///
/// A non-empty bot token enables Telegram even when the file has no
/// `[channel.telegram]` section.
pub fn apply_env_overrides(config: &mut Config, bot_token: Option<String>) {
    let Some(token) = bot_token.filter(|t| !t.trim().is_empty()) else {
        return;
    };
    match config.channel.telegram.as_mut() {
        Some(tg) => tg.bot_token = token,
        None => {
            config.channel.telegram = Some(TelegramConfig {
                enabled: true,
                bot_token: token,
                allowed_users: Vec::new(),
            });
        }
    }
}

/// Where [`load`] got its configuration from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. The bot token may
/// come from the `TELEGRAM_BOT_TOKEN` environment variable. Nothing is
/// logged here since this runs before logging is set up.
pub fn load(path: &str) -> Result<(Config, ConfigSource), TaskbotError> {
    let path = Path::new(path);
    let (mut config, source) = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TaskbotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        (parse(&content)?, ConfigSource::File)
    } else {
        (Config::default(), ConfigSource::Defaults)
    };

    apply_env_overrides(&mut config, std::env::var(BOT_TOKEN_ENV).ok());
    Ok((config, source))
}

/// Parse and validate configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, TaskbotError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| TaskbotError::Config(format!("failed to parse config: {}", e)))?;
    config.reminders.fire_time()?;
    Ok(config)
}
