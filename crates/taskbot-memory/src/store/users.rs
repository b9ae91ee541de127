//! User registration.

use super::{map_sqlx_error, Store};
use taskbot_core::error::TaskbotError;

impl Store {
    /// Register a user. Idempotent: a second call for the same `chat_id` is a
    /// no-op. Returns `true` if a new row was created.
    pub async fn register_user(
        &self,
        chat_id: i64,
        display_name: Option<&str>,
    ) -> Result<bool, TaskbotError> {
        let result = sqlx::query(
            "INSERT INTO users (chat_id, display_name) VALUES (?, ?) \
             ON CONFLICT (chat_id) DO NOTHING",
        )
        .bind(chat_id)
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("register user failed", e))?;

        Ok(result.rows_affected() > 0)
    }
}
