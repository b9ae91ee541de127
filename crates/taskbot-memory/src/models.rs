//! Row types returned by the store.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Storage format for calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown task status '{other}'")),
        }
    }
}

/// A time-bound task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    /// Chat ID of the owning user.
    pub owner: i64,
    pub title: String,
    pub deadline: NaiveDate,
    pub status: TaskStatus,
}

/// A recurring habit with its completion streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: i64,
    pub owner: i64,
    pub title: String,
    /// Free-text cadence label ("daily", "every Monday", ...). Sets the
    /// gap [`Habit::period_days`] allows between checks.
    pub frequency: String,
    pub streak: i64,
    pub last_checked: Option<NaiveDate>,
}

impl Habit {
    /// Longest gap in days between two checks that keeps the streak alive.
    pub fn period_days(&self) -> i64 {
        period_days(&self.frequency)
    }

    /// Streak as of `today`: the stored count while the chain is unbroken
    /// (last check no more than one period ago), otherwise 0.
    pub fn current_streak(&self, today: NaiveDate) -> i64 {
        match self.last_checked {
            Some(day) if (0..=self.period_days()).contains(&(today - day).num_days()) => {
                self.streak
            }
            Some(_) => 0,
            None => self.streak,
        }
    }

    /// Streak after a check on `today`, or `None` if already checked that day.
    pub fn streak_after_check(&self, today: NaiveDate) -> Option<i64> {
        let Some(last) = self.last_checked else {
            return Some(1);
        };
        match (today - last).num_days() {
            0 => None,
            gap if (1..=self.period_days()).contains(&gap) => Some(self.streak + 1),
            _ => Some(1),
        }
    }
}

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Days per cycle for a free-text cadence label.
///
/// Understands `daily`, `weekly` (and weekday names, "3 times a week"),
/// `fortnightly`, `monthly`, and `every N days|weeks`. Anything else counts
/// as daily.
pub fn period_days(frequency: &str) -> i64 {
    let label = frequency.to_lowercase();
    let words: Vec<&str> = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    // "every 3 days", "every 2 weeks"
    for pair in words.windows(2) {
        if let Ok(n) = pair[0].parse::<i64>() {
            if n > 0 && pair[1].starts_with("day") {
                return n;
            }
            if n > 0 && pair[1].starts_with("week") && !label.contains("times") {
                return n * 7;
            }
        }
    }

    if words.iter().any(|w| w.starts_with("fortnight")) {
        14
    } else if words.iter().any(|w| w.starts_with("month")) {
        31
    } else if words
        .iter()
        .any(|w| w.starts_with("week") || WEEKDAYS.contains(w))
    {
        7
    } else {
        1
    }
}

/// Outcome of checking off a habit for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitCheck {
    /// The check was recorded; carries the new streak.
    Counted(i64),
    /// The habit was already checked that day; carries the unchanged streak.
    AlreadyChecked(i64),
    /// No habit with that ID belongs to the user.
    NotFound,
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| format!("bad date '{raw}': {e}"))
}
