//! Habit CRUD and streak tracking.

use super::{map_sqlx_error, Store};
use crate::models::{format_date, parse_date, Habit, HabitCheck};
use chrono::NaiveDate;
use taskbot_core::error::TaskbotError;

type HabitRow = (i64, i64, String, String, i64, Option<String>);

impl Store {
    /// Create a habit with a zero streak.
    pub async fn add_habit(
        &self,
        owner: i64,
        title: &str,
        frequency: &str,
    ) -> Result<i64, TaskbotError> {
        let result = sqlx::query("INSERT INTO habits (owner, title, frequency) VALUES (?, ?, ?)")
            .bind(owner)
            .bind(title)
            .bind(frequency)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create habit failed", e))?;

        Ok(result.last_insert_rowid())
    }

    /// All habits of `owner` in creation order.
    pub async fn habits_for(&self, owner: i64) -> Result<Vec<Habit>, TaskbotError> {
        let rows: Vec<HabitRow> = sqlx::query_as(
            "SELECT id, owner, title, frequency, streak, last_checked \
             FROM habits WHERE owner = ? ORDER BY id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get habits failed", e))?;

        rows.into_iter().map(habit_from_row).collect()
    }

    /// Record that `owner` did habit `habit_id` on `today`.
    ///
    /// Checked within the habit's period: streak + 1. Already checked
    /// today: unchanged. Otherwise the streak restarts at 1.
    pub async fn check_habit(
        &self,
        owner: i64,
        habit_id: i64,
        today: NaiveDate,
    ) -> Result<HabitCheck, TaskbotError> {
        let row: Option<HabitRow> = sqlx::query_as(
            "SELECT id, owner, title, frequency, streak, last_checked \
             FROM habits WHERE id = ? AND owner = ?",
        )
        .bind(habit_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("habit lookup failed", e))?;

        let Some(row) = row else {
            return Ok(HabitCheck::NotFound);
        };
        let habit = habit_from_row(row)?;

        let Some(streak) = habit.streak_after_check(today) else {
            return Ok(HabitCheck::AlreadyChecked(habit.streak));
        };

        sqlx::query("UPDATE habits SET streak = ?, last_checked = ? WHERE id = ? AND owner = ?")
            .bind(streak)
            .bind(format_date(today))
            .bind(habit_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("habit check failed", e))?;

        Ok(HabitCheck::Counted(streak))
    }
}

fn habit_from_row(row: HabitRow) -> Result<Habit, TaskbotError> {
    let (id, owner, title, frequency, streak, last_checked) = row;
    let last_checked = last_checked
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(TaskbotError::query)?;
    Ok(Habit {
        id,
        owner,
        title,
        frequency,
        streak,
        last_checked,
    })
}
