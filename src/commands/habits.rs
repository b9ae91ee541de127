//! Habit command handlers: /view_habits, /check.

use super::position_arg;
use crate::messages;
use chrono::NaiveDate;
use taskbot_memory::{HabitCheck, Store};
use tracing::error;

pub(super) async fn handle_view_habits(store: &Store, sender_id: i64, today: NaiveDate) -> String {
    match store.habits_for(sender_id).await {
        Ok(habits) if habits.is_empty() => messages::NO_HABITS.to_string(),
        Ok(habits) => {
            let mut out = messages::HABITS_HEADER.to_string();
            for (i, habit) in habits.iter().enumerate() {
                out.push('\n');
                out.push_str(&messages::habit_line(
                    i + 1,
                    &habit.title,
                    habit.current_streak(today),
                ));
            }
            out
        }
        Err(e) => {
            error!("failed to list habits for {sender_id}: {e}");
            messages::LOAD_HABITS_FAILED.to_string()
        }
    }
}

/// `/check <n>`: `n` is the position in `/view_habits`.
pub(super) async fn handle_check(
    store: &Store,
    sender_id: i64,
    text: &str,
    today: NaiveDate,
) -> String {
    let Some(position) = position_arg(text) else {
        return messages::CHECK_USAGE.to_string();
    };

    let habits = match store.habits_for(sender_id).await {
        Ok(h) => h,
        Err(e) => {
            error!("failed to list habits for {sender_id}: {e}");
            return messages::LOAD_HABITS_FAILED.to_string();
        }
    };
    let Some(habit) = habits.get(position - 1) else {
        return messages::NO_SUCH_HABIT.to_string();
    };

    match store.check_habit(sender_id, habit.id, today).await {
        Ok(HabitCheck::Counted(streak)) => messages::habit_checked(&habit.title, streak),
        Ok(HabitCheck::AlreadyChecked(streak)) => {
            messages::habit_already_checked(&habit.title, streak)
        }
        Ok(HabitCheck::NotFound) => messages::NO_SUCH_HABIT.to_string(),
        Err(e) => {
            error!("failed to check habit {} for {sender_id}: {e}", habit.id);
            messages::GENERIC_ERROR.to_string()
        }
    }
}
