//! Task CRUD and due-date queries.

use super::{map_sqlx_error, Store};
use crate::models::{format_date, parse_date, Task, TaskStatus};
use chrono::NaiveDate;
use taskbot_core::error::TaskbotError;

type TaskRow = (i64, i64, String, String, String);

const TASK_COLUMNS: &str = "id, owner, title, deadline, status";

impl Store {
    /// Create a pending task for `owner`. Fails with a query error if the
    /// owner has not registered.
    pub async fn add_task(
        &self,
        owner: i64,
        title: &str,
        deadline: NaiveDate,
    ) -> Result<i64, TaskbotError> {
        let result = sqlx::query("INSERT INTO tasks (owner, title, deadline) VALUES (?, ?, ?)")
            .bind(owner)
            .bind(title)
            .bind(format_date(deadline))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create task failed", e))?;

        Ok(result.last_insert_rowid())
    }

    /// Pending tasks for `owner`, earliest deadline first.
    pub async fn pending_tasks_for(&self, owner: i64) -> Result<Vec<Task>, TaskbotError> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE owner = ? AND status = 'pending' \
             ORDER BY deadline ASC, id ASC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get tasks failed", e))?;

        rows.into_iter().map(task_from_row).collect()
    }

    /// Pending tasks across all users whose deadline is `day`.
    pub async fn tasks_due_on(&self, day: NaiveDate) -> Result<Vec<Task>, TaskbotError> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE status = 'pending' AND deadline = ? \
             ORDER BY owner ASC, id ASC"
        ))
        .bind(format_date(day))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get due tasks failed", e))?;

        rows.into_iter().map(task_from_row).collect()
    }

    /// Mark one of `owner`'s pending tasks done. Returns `false` if no
    /// pending task with that ID belongs to the owner.
    pub async fn complete_task(&self, owner: i64, task_id: i64) -> Result<bool, TaskbotError> {
        let result = sqlx::query(
            "UPDATE tasks SET status = 'done' \
             WHERE id = ? AND owner = ? AND status = 'pending'",
        )
        .bind(task_id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("complete task failed", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn task_from_row(row: TaskRow) -> Result<Task, TaskbotError> {
    let (id, owner, title, deadline, status) = row;
    Ok(Task {
        id,
        owner,
        title,
        deadline: parse_date(&deadline).map_err(TaskbotError::query)?,
        status: status.parse::<TaskStatus>().map_err(TaskbotError::query)?,
    })
}
