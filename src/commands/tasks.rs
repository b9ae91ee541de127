//! Task command handlers: /view_tasks, /done.

use super::position_arg;
use crate::messages;
use taskbot_memory::Store;
use tracing::{error, info};

pub(super) async fn handle_view_tasks(store: &Store, sender_id: i64) -> String {
    match store.pending_tasks_for(sender_id).await {
        Ok(tasks) if tasks.is_empty() => messages::NO_TASKS.to_string(),
        Ok(tasks) => {
            let mut out = messages::TASKS_HEADER.to_string();
            for (i, task) in tasks.iter().enumerate() {
                out.push('\n');
                out.push_str(&messages::task_line(i + 1, &task.title, task.deadline));
            }
            out
        }
        Err(e) => {
            error!("failed to list tasks for {sender_id}: {e}");
            messages::LOAD_TASKS_FAILED.to_string()
        }
    }
}

/// `/done <n>`: `n` is the position in `/view_tasks`.
pub(super) async fn handle_done(store: &Store, sender_id: i64, text: &str) -> String {
    let Some(position) = position_arg(text) else {
        return messages::DONE_USAGE.to_string();
    };

    let tasks = match store.pending_tasks_for(sender_id).await {
        Ok(t) => t,
        Err(e) => {
            error!("failed to list tasks for {sender_id}: {e}");
            return messages::LOAD_TASKS_FAILED.to_string();
        }
    };
    let Some(task) = tasks.get(position - 1) else {
        return messages::NO_SUCH_TASK.to_string();
    };

    match store.complete_task(sender_id, task.id).await {
        Ok(true) => {
            info!("task {} done for {sender_id}", task.id);
            messages::task_done(&task.title)
        }
        Ok(false) => messages::NO_SUCH_TASK.to_string(),
        Err(e) => {
            error!("failed to complete task {} for {sender_id}: {e}", task.id);
            messages::GENERIC_ERROR.to_string()
        }
    }
}
