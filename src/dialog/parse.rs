//! Parsing rules for dialog replies.

use chrono::NaiveDate;
use thiserror::Error;

/// A reply that does not fit the format the dialog asked for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogParseError {
    #[error("expected '<title> <YYYY-MM-DD>'")]
    TaskFormat,
    #[error("expected '<title> - <frequency>'")]
    HabitFormat,
    #[error("habit frequency is empty")]
    EmptyFrequency,
}

/// Parsed reply to the task dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub title: String,
    pub deadline: NaiveDate,
}

/// Parsed reply to the habit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDetails {
    pub title: String,
    pub frequency: String,
}

/// Parse `<title><whitespace><YYYY-MM-DD>`; the date must end the input.
pub fn parse_task_details(input: &str) -> Result<TaskDetails, DialogParseError> {
    let input = input.trim();
    let (head, date) = input
        .rsplit_once(char::is_whitespace)
        .ok_or(DialogParseError::TaskFormat)?;

    if !is_iso_date_shape(date) {
        return Err(DialogParseError::TaskFormat);
    }
    let deadline =
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| DialogParseError::TaskFormat)?;

    let title = head.trim();
    if title.is_empty() {
        return Err(DialogParseError::TaskFormat);
    }

    Ok(TaskDetails {
        title: title.to_string(),
        deadline,
    })
}

/// Parse `<title> - <frequency>`, splitting at the last hyphen.
pub fn parse_habit_details(input: &str) -> Result<HabitDetails, DialogParseError> {
    let (title, frequency) = input
        .rsplit_once('-')
        .ok_or(DialogParseError::HabitFormat)?;

    let title = title.trim();
    if title.is_empty() {
        return Err(DialogParseError::HabitFormat);
    }
    let frequency = frequency.trim();
    if frequency.is_empty() {
        return Err(DialogParseError::EmptyFrequency);
    }

    Ok(HabitDetails {
        title: title.to_string(),
        frequency: frequency.to_string(),
    })
}

/// Exactly `DDDD-DD-DD`.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
