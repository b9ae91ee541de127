//! User-facing reply texts.

use chrono::NaiveDate;

pub const WELCOME: &str = "👋 Hi! I'll help you manage tasks and keep track of habits.\n\
                           Send /help to see what I can do.";

pub const HELP: &str = "Here's what I can do:\n\
                        /add_tasking — add a task with a deadline\n\
                        /view_tasks — list your pending tasks\n\
                        /done <n> — mark task number n as done\n\
                        /add_habit — add a habit\n\
                        /view_habits — list your habits and streaks\n\
                        /check <n> — mark habit number n as done today\n\
                        /cancel — stop adding a task or habit";

pub const TASK_PROMPT: &str = "✏️ Send the task as: <title> <YYYY-MM-DD>\n\
                               For example: Finish project 2024-12-15";

pub const TASK_FORMAT_ERROR: &str = "⚠️ Wrong format. The task needs a title followed by a date, \
                                     like: Finish project 2024-12-15\n\
                                     Send /add_tasking to try again.";

pub const HABIT_PROMPT: &str = "✏️ Send the habit and how often you want to do it, \
                                separated by a hyphen.\n\
                                For example: Exercise - daily";

pub const HABIT_FORMAT_ERROR: &str = "⚠️ Wrong format. Use: <habit> - <frequency>, \
                                      like: Exercise - daily\n\
                                      Send /add_habit to try again.";

pub const HABIT_EMPTY_FREQUENCY: &str = "⚠️ The frequency can't be empty.\n\
                                         Send /add_habit to try again.";

pub const SAVE_FAILED: &str = "⚠️ Something went wrong while saving. \
                               Make sure you've sent /start, then try again.";

pub const GENERIC_ERROR: &str = "⚠️ Something went wrong. Please try again later.";

pub const NO_TASKS: &str = "You have no tasks.";
pub const TASKS_HEADER: &str = "Your tasks:";
pub const LOAD_TASKS_FAILED: &str = "⚠️ Couldn't load your tasks right now. Please try again later.";

pub const NO_HABITS: &str = "You have no habits.";
pub const HABITS_HEADER: &str = "Your habits:";
pub const LOAD_HABITS_FAILED: &str =
    "⚠️ Couldn't load your habits right now. Please try again later.";

pub const DONE_USAGE: &str = "Usage: /done <n>, where n is the task number from /view_tasks.";
pub const NO_SUCH_TASK: &str = "There's no pending task with that number. See /view_tasks.";

pub const CHECK_USAGE: &str = "Usage: /check <n>, where n is the habit number from /view_habits.";
pub const NO_SUCH_HABIT: &str = "There's no habit with that number. See /view_habits.";

pub const CANCELLED: &str = "OK, cancelled.";
pub const NOTHING_TO_CANCEL: &str = "There's nothing to cancel.";

pub const UNKNOWN_INPUT: &str = "I didn't get that. Send /help to see the commands.";

pub fn task_added(title: &str, deadline: NaiveDate) -> String {
    format!("✅ Task '{title}' with deadline {deadline} added.")
}

pub fn habit_added(title: &str, frequency: &str) -> String {
    format!("✅ Habit '{title}' added with frequency: {frequency}.")
}

pub fn task_line(position: usize, title: &str, deadline: NaiveDate) -> String {
    format!("{position}. {title} — {deadline}")
}

pub fn habit_line(position: usize, title: &str, streak: i64) -> String {
    format!("{position}. {title} (streak: {streak} days)")
}

pub fn task_done(title: &str) -> String {
    format!("🎉 Task '{title}' is done.")
}

pub fn habit_checked(title: &str, streak: i64) -> String {
    format!("💪 '{title}' checked for today. Streak: {streak} days.")
}

pub fn habit_already_checked(title: &str, streak: i64) -> String {
    format!("'{title}' is already checked for today. Streak: {streak} days.")
}

pub fn reminder(title: &str) -> String {
    format!("⏰ Reminder: task '{title}' is due today.")
}
