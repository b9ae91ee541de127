use crate::{
    dialog::DialogState,
    error::TaskbotError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// A messaging platform implements this trait to receive and send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, TaskbotError>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), TaskbotError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TaskbotError> {
        Ok(())
    }
}

/// Per-user dialog state storage.
///
/// The in-process default is [`crate::dialog::InMemoryDialogStore`]; a
/// multi-process deployment can back this with an external keyed store.
#[async_trait]
pub trait DialogStore: Send + Sync {
    /// Current state for `user_id`. Users without an entry are `Idle`.
    async fn get(&self, user_id: i64) -> DialogState;

    /// Replace the state for `user_id`.
    async fn set(&self, user_id: i64, state: DialogState);

    /// Reset `user_id` to `Idle`.
    async fn clear(&self, user_id: i64);
}
