//! Gateway: the main event loop connecting the channel, the store, dialogs,
//! and the daily reminder job.

pub mod reminders;


use crate::{
    commands::{self, Command, CommandContext},
    dialog, messages,
};
use chrono::NaiveDate;
use reminders::ReminderJob;
use std::collections::HashMap;
use std::sync::Arc;
use taskbot_core::{
    config::ReminderConfig,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, DialogStore},
};
use taskbot_memory::Store;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Routes inbound messages to commands and dialogs and sends the replies.
pub struct Gateway {
    channel: Arc<dyn Channel>,
    store: Store,
    dialogs: Arc<dyn DialogStore>,
    reminders: ReminderConfig,
    reminder_job: Arc<ReminderJob>,
    /// Senders with a message in flight. Later messages queue here so each
    /// user's messages are handled in arrival order.
    active_senders: Mutex<HashMap<i64, Vec<IncomingMessage>>>,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        store: Store,
        dialogs: Arc<dyn DialogStore>,
        reminders: ReminderConfig,
    ) -> Self {
        let reminder_job = Arc::new(ReminderJob::new(store.clone(), channel.clone()));
        Self {
            channel,
            store,
            dialogs,
            reminders,
            reminder_job,
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until Ctrl-C or the channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        let mut rx: mpsc::Receiver<IncomingMessage> = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        info!("Channel started: {}", self.channel.name());

        let reminder_handle = if self.reminders.enabled {
            let at = self.reminders.fire_time()?;
            let job = self.reminder_job.clone();
            info!("Daily reminders at {}", at.format("%H:%M"));
            Some(tokio::spawn(reminders::reminder_loop(job, at)))
        } else {
            info!("Daily reminders disabled");
            None
        };

        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(incoming) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.dispatch_message(incoming).await;
                        });
                    }
                    None => {
                        warn!("channel {} closed its message stream", self.channel.name());
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(reminder_handle).await;
        Ok(())
    }

    /// Dispatch a message: queue it if the sender is busy, otherwise process
    /// it and then drain the sender's queue.
    async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let sender = incoming.sender_id;

        {
            let mut active = self.active_senders.lock().await;
            if let Some(queue) = active.get_mut(&sender) {
                debug!("queued message from {sender}");
                queue.push(incoming);
                return;
            }
            active.insert(sender, Vec::new());
        }

        self.handle_message(incoming).await;

        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender) {
                    Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                    _ => {
                        active.remove(&sender);
                        None
                    }
                }
            };

            match next {
                Some(queued) => self.handle_message(queued).await,
                None => break,
            }
        }
    }

    async fn handle_message(&self, incoming: IncomingMessage) {
        let today = chrono::Local::now().date_naive();
        let reply = self.respond(&incoming, today).await;
        let msg = OutgoingMessage::new(incoming.chat_id, reply);
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to reply to {}: {e}", incoming.sender_id);
        }
    }

    /// Compute the reply to one inbound message.
    ///
    /// Known commands win. Anything else goes to the sender's open dialog,
    /// and falls back to a hint when there is none.
    pub(crate) async fn respond(&self, incoming: &IncomingMessage, today: NaiveDate) -> String {
        let text = incoming.text.trim();

        if let Some(cmd) = Command::parse(text) {
            info!("command {cmd:?} from {}", incoming.sender_id);
            let ctx = CommandContext {
                store: &self.store,
                dialogs: self.dialogs.as_ref(),
                sender_id: incoming.sender_id,
                sender_name: incoming.sender_name.as_deref(),
                text,
                today,
            };
            return commands::handle(cmd, &ctx).await;
        }

        match dialog::handle_reply(&self.store, self.dialogs.as_ref(), incoming.sender_id, text)
            .await
        {
            Some(reply) => reply,
            None => messages::UNKNOWN_INPUT.to_string(),
        }
    }

    async fn shutdown(&self, reminder_handle: Option<tokio::task::JoinHandle<()>>) {
        info!("Shutting down...");

        if let Some(h) = reminder_handle {
            h.abort();
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }

        info!("Shutdown complete.");
    }
}
