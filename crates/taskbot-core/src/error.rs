use thiserror::Error;

/// Top-level error type for taskbot.
#[derive(Debug, Error)]
pub enum TaskbotError {
    /// Error from the relational store.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

/// Failures raised by the store, split by where they happened.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The database could not be opened or a connection could not be acquired.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement failed: malformed SQL, constraint violation, bad row data.
    #[error("query failed: {0}")]
    Query(String),

    /// Schema setup failed.
    #[error("migration failed: {0}")]
    Migration(String),
}

impl TaskbotError {
    /// Shorthand for a [`PersistenceError::Query`].
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Persistence(PersistenceError::Query(msg.into()))
    }

    /// Shorthand for a [`PersistenceError::Connection`].
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Persistence(PersistenceError::Connection(msg.into()))
    }

    /// Shorthand for a [`PersistenceError::Migration`].
    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Persistence(PersistenceError::Migration(msg.into()))
    }
}
