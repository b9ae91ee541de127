//! SQLite-backed persistent store.
//!
//! Split into focused submodules:
//! - `users` — registration upsert and lookup
//! - `tasks` — task creation, listing, due-date queries, completion
//! - `habits` — habit creation, listing, and streak checks

mod habits;
mod tasks;
mod users;

use crate::models::format_date;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::fmt;
use std::str::FromStr;
use taskbot_core::{config::MemoryConfig, error::TaskbotError, shellexpand};
use tracing::info;

/// Keywords that make [`Store::execute`] return rows instead of committing.
const READ_KEYWORDS: &[&str] = &["select", "with", "pragma", "explain"];

/// Persistent store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

/// A positional parameter for [`Store::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Param<'a> {
    Int(i64),
    Text(&'a str),
    Date(NaiveDate),
    Null,
}

/// Result of [`Store::execute`].
pub enum Executed {
    /// A read statement ran; all matching rows.
    Rows(Vec<SqliteRow>),
    /// A write statement ran and was committed.
    Done { rows_affected: u64 },
}

// `SqliteRow` has no `Debug`, so rows are shown by count.
impl fmt::Debug for Executed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(rows) => f.debug_tuple("Rows").field(&rows.len()).finish(),
            Self::Done { rows_affected } => f
                .debug_struct("Done")
                .field("rows_affected", rows_affected)
                .finish(),
        }
    }
}

/// Row counts for the `status` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: i64,
    pub pending_tasks: i64,
    pub habits: i64,
}

impl Store {
    /// Open the database, creating it if missing, and bring the schema up to date.
    pub async fn new(config: &MemoryConfig) -> Result<Self, TaskbotError> {
        let db_path = shellexpand(&config.db_path);

        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TaskbotError::connection(format!("failed to create data dir: {e}"))
                })?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| TaskbotError::connection(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(opts)
            .await
            .map_err(|e| TaskbotError::connection(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a single statement with positional parameters.
    ///
    /// Statements starting with a read keyword (`SELECT`, `WITH`, `PRAGMA`,
    /// `EXPLAIN`) return every matching row. Anything else is executed and
    /// committed, returning the affected row count.
    pub async fn execute(&self, sql: &str, params: &[Param<'_>]) -> Result<Executed, TaskbotError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                Param::Int(v) => query.bind(*v),
                Param::Text(s) => query.bind(s.to_string()),
                Param::Date(d) => query.bind(format_date(*d)),
                Param::Null => query.bind(None::<String>),
            };
        }

        if is_read_statement(sql) {
            let rows = query
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("execute", e))?;
            Ok(Executed::Rows(rows))
        } else {
            let result = query
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("execute", e))?;
            Ok(Executed::Done {
                rows_affected: result.rows_affected(),
            })
        }
    }

    /// Count users, pending tasks, and habits.
    pub async fn counts(&self) -> Result<StoreCounts, TaskbotError> {
        let sql = "SELECT \
                   (SELECT COUNT(*) FROM users), \
                   (SELECT COUNT(*) FROM tasks WHERE status = ?), \
                   (SELECT COUNT(*) FROM habits)";
        let rows = match self.execute(sql, &[Param::Text("pending")]).await? {
            Executed::Rows(rows) => rows,
            Executed::Done { .. } => return Ok(StoreCounts::default()),
        };
        let Some(row) = rows.first() else {
            return Ok(StoreCounts::default());
        };
        let get = |idx: usize| -> Result<i64, TaskbotError> {
            row.try_get::<i64, _>(idx)
                .map_err(|e| TaskbotError::query(format!("counts decode failed: {e}")))
        };
        Ok(StoreCounts {
            users: get(0)?,
            pending_tasks: get(1)?,
            habits: get(2)?,
        })
    }

    /// Run SQL migrations, tracking which have already been applied.
    pub async fn run_migrations(pool: &SqlitePool) -> Result<(), TaskbotError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| TaskbotError::migration(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] = &[
            ("001_init", include_str!("../migrations/001_init.sql")),
            (
                "002_habit_checks",
                include_str!("../migrations/002_habit_checks.sql"),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        TaskbotError::migration(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| TaskbotError::migration(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    TaskbotError::migration(format!("failed to record migration {name}: {e}"))
                })?;

            info!("applied migration {name}");
        }
        Ok(())
    }
}

/// Whether `sql` starts with a keyword that produces rows.
pub(crate) fn is_read_statement(sql: &str) -> bool {
    let first = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    READ_KEYWORDS.contains(&first.as_str())
}

/// Classify a driver error as a connection or query failure.
pub(crate) fn map_sqlx_error(context: &str, e: sqlx::Error) -> TaskbotError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => TaskbotError::connection(format!("{context}: {e}")),
        other => TaskbotError::query(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests;
