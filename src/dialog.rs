//! Two-step dialogs: prompt, then parse the user's next reply into a record.
//!
//! `start` puts the user in `AwaitingInput(kind)`; the next plain message
//! goes to `handle_reply`, which always leaves the user `Idle` again.

mod parse;

#[cfg(test)]
mod tests;

pub use parse::{parse_habit_details, parse_task_details, DialogParseError};

use crate::messages;
use taskbot_core::{
    dialog::{DialogKind, DialogState},
    traits::DialogStore,
};
use taskbot_memory::Store;
use tracing::{error, info};

/// Open a dialog of `kind` for `user_id` and return the instruction to send.
pub async fn start(dialogs: &dyn DialogStore, user_id: i64, kind: DialogKind) -> &'static str {
    dialogs.set(user_id, DialogState::AwaitingInput(kind)).await;
    match kind {
        DialogKind::TaskDetails => messages::TASK_PROMPT,
        DialogKind::HabitDetails => messages::HABIT_PROMPT,
    }
}

/// Handle a plain message from `user_id`.
///
/// Returns `None` if the user has no open dialog. Otherwise the dialog is
/// closed before the reply is processed, so every outcome ends `Idle`.
pub async fn handle_reply(
    store: &Store,
    dialogs: &dyn DialogStore,
    user_id: i64,
    text: &str,
) -> Option<String> {
    let DialogState::AwaitingInput(kind) = dialogs.get(user_id).await else {
        return None;
    };
    dialogs.clear(user_id).await;

    let reply = match kind {
        DialogKind::TaskDetails => add_task(store, user_id, text).await,
        DialogKind::HabitDetails => add_habit(store, user_id, text).await,
    };
    Some(reply)
}

async fn add_task(store: &Store, user_id: i64, text: &str) -> String {
    let details = match parse_task_details(text) {
        Ok(d) => d,
        Err(e) => {
            info!("task dialog: rejected input from {user_id}: {e}");
            return messages::TASK_FORMAT_ERROR.to_string();
        }
    };

    match store.add_task(user_id, &details.title, details.deadline).await {
        Ok(id) => {
            info!("task {id} added for {user_id}");
            messages::task_added(&details.title, details.deadline)
        }
        Err(e) => {
            error!("task dialog: failed to save task for {user_id}: {e}");
            messages::SAVE_FAILED.to_string()
        }
    }
}

async fn add_habit(store: &Store, user_id: i64, text: &str) -> String {
    let details = match parse_habit_details(text) {
        Ok(d) => d,
        Err(DialogParseError::EmptyFrequency) => {
            info!("habit dialog: empty frequency from {user_id}");
            return messages::HABIT_EMPTY_FREQUENCY.to_string();
        }
        Err(e) => {
            info!("habit dialog: rejected input from {user_id}: {e}");
            return messages::HABIT_FORMAT_ERROR.to_string();
        }
    };

    match store
        .add_habit(user_id, &details.title, &details.frequency)
        .await
    {
        Ok(id) => {
            info!("habit {id} added for {user_id}");
            messages::habit_added(&details.title, &details.frequency)
        }
        Err(e) => {
            error!("habit dialog: failed to save habit for {user_id}: {e}");
            messages::SAVE_FAILED.to_string()
        }
    }
}
