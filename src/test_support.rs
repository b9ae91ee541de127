//! Shared fixtures for the binary's tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use taskbot_core::{
    config::MemoryConfig,
    error::TaskbotError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use taskbot_memory::Store;
use tokio::sync::{mpsc, Mutex};

/// A fresh in-memory store with migrations applied.
pub async fn test_store() -> Store {
    let config = MemoryConfig {
        db_path: ":memory:".to_string(),
        max_connections: 1,
    };
    Store::new(&config).await.unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Channel that records outgoing messages instead of sending them.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    /// Sends to these chats fail.
    pub failing: Vec<i64>,
}

impl RecordingChannel {
    pub fn failing_for(chats: &[i64]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: chats.to_vec(),
        }
    }

    pub async fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, TaskbotError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TaskbotError> {
        if self.failing.contains(&message.chat_id) {
            return Err(TaskbotError::Channel(format!(
                "chat {} unreachable",
                message.chat_id
            )));
        }
        self.sent.lock().await.push(message);
        Ok(())
    }
}

pub fn incoming(sender_id: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        id: uuid::Uuid::new_v4(),
        channel: "recording".into(),
        sender_id,
        sender_name: Some(format!("user{sender_id}")),
        text: text.into(),
        timestamp: chrono::Utc::now(),
        chat_id: sender_id,
    }
}
