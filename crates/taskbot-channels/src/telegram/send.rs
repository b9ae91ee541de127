//! Message sending and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use taskbot_core::error::TaskbotError;
use tracing::{info, warn};

/// Telegram's per-message text limit.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a plain-text message to a chat, split into chunks if needed.
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TaskbotError> {
        let url = format!("{}/sendMessage", self.base_url);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| TaskbotError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(TaskbotError::Channel(format!(
                    "telegram send to {chat_id} failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        if self.commands.is_empty() {
            return;
        }

        let commands = serde_json::json!({ "commands": self.command_menu() });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }

    /// `setMyCommands` entries: command names without the leading slash.
    pub(crate) fn command_menu(&self) -> Vec<serde_json::Value> {
        self.commands
            .iter()
            .map(|(command, description)| {
                serde_json::json!({
                    "command": command.trim_start_matches('/'),
                    "description": description,
                })
            })
            .collect()
    }
}
