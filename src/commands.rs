//! Built-in bot commands.

mod habits;
mod tasks;


use crate::{dialog, messages};
use chrono::NaiveDate;
use taskbot_core::{dialog::DialogKind, traits::DialogStore};
use taskbot_memory::Store;
use tracing::{error, info};

/// Command menu published to Telegram: `(command, description)`.
pub const MENU: &[(&str, &str)] = &[
    ("start", "Register with the bot"),
    ("add_tasking", "Add a task with a deadline"),
    ("view_tasks", "List your pending tasks"),
    ("done", "Mark a task as done"),
    ("add_habit", "Add a habit"),
    ("view_habits", "List your habits and streaks"),
    ("check", "Mark a habit as done today"),
    ("cancel", "Stop adding a task or habit"),
    ("help", "Show available commands"),
];

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub dialogs: &'a dyn DialogStore,
    pub sender_id: i64,
    pub sender_name: Option<&'a str>,
    pub text: &'a str,
    pub today: NaiveDate,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    AddTask,
    ViewTasks,
    Done,
    AddHabit,
    ViewHabits,
    Check,
    Cancel,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for plain text and
    /// unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@taskbot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/add_tasking" => Some(Self::AddTask),
            "/view_tasks" => Some(Self::ViewTasks),
            "/done" => Some(Self::Done),
            "/add_habit" => Some(Self::AddHabit),
            "/view_habits" => Some(Self::ViewHabits),
            "/check" => Some(Self::Check),
            "/cancel" => Some(Self::Cancel),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Handle a command and return the response text.
///
/// Any command abandons a dialog the sender left open.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    if cmd != Command::Cancel {
        ctx.dialogs.clear(ctx.sender_id).await;
    }

    match cmd {
        Command::Start => handle_start(ctx).await,
        Command::AddTask => {
            dialog::start(ctx.dialogs, ctx.sender_id, DialogKind::TaskDetails)
                .await
                .to_string()
        }
        Command::ViewTasks => tasks::handle_view_tasks(ctx.store, ctx.sender_id).await,
        Command::Done => tasks::handle_done(ctx.store, ctx.sender_id, ctx.text).await,
        Command::AddHabit => {
            dialog::start(ctx.dialogs, ctx.sender_id, DialogKind::HabitDetails)
                .await
                .to_string()
        }
        Command::ViewHabits => {
            habits::handle_view_habits(ctx.store, ctx.sender_id, ctx.today).await
        }
        Command::Check => {
            habits::handle_check(ctx.store, ctx.sender_id, ctx.text, ctx.today).await
        }
        Command::Cancel => handle_cancel(ctx).await,
        Command::Help => messages::HELP.to_string(),
    }
}

async fn handle_start(ctx: &CommandContext<'_>) -> String {
    match ctx.store.register_user(ctx.sender_id, ctx.sender_name).await {
        Ok(true) => info!("registered user {}", ctx.sender_id),
        Ok(false) => {}
        Err(e) => {
            error!("failed to register user {}: {e}", ctx.sender_id);
            return messages::GENERIC_ERROR.to_string();
        }
    }
    messages::WELCOME.to_string()
}

async fn handle_cancel(ctx: &CommandContext<'_>) -> String {
    if ctx.dialogs.get(ctx.sender_id).await.is_idle() {
        return messages::NOTHING_TO_CANCEL.to_string();
    }
    ctx.dialogs.clear(ctx.sender_id).await;
    messages::CANCELLED.to_string()
}

/// Parse the 1-based list position argument of `/done` and `/check`.
fn position_arg(text: &str) -> Option<usize> {
    text.split_whitespace()
        .nth(1)?
        .trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
}
