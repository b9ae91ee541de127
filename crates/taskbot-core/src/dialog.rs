//! Dialog state types and the in-memory [`DialogStore`].

use crate::traits::DialogStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// What an open dialog is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// `<title> <YYYY-MM-DD>`
    TaskDetails,
    /// `<title> - <frequency>`
    HabitDetails,
}

/// Per-user conversation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Idle,
    AwaitingInput(DialogKind),
}

impl DialogState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Single-process dialog store keyed by user ID.
///
/// Only non-idle users are kept in the map.
#[derive(Debug, Default)]
pub struct InMemoryDialogStore {
    states: Mutex<HashMap<i64, DialogKind>>,
}

impl InMemoryDialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with an open dialog.
    pub async fn open_dialogs(&self) -> usize {
        self.states.lock().await.len()
    }
}

#[async_trait]
impl DialogStore for InMemoryDialogStore {
    async fn get(&self, user_id: i64) -> DialogState {
        match self.states.lock().await.get(&user_id) {
            Some(kind) => DialogState::AwaitingInput(*kind),
            None => DialogState::Idle,
        }
    }

    async fn set(&self, user_id: i64, state: DialogState) {
        let mut states = self.states.lock().await;
        match state {
            DialogState::AwaitingInput(kind) => {
                states.insert(user_id, kind);
            }
            DialogState::Idle => {
                states.remove(&user_id);
            }
        }
    }

    async fn clear(&self, user_id: i64) {
        self.states.lock().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_is_idle() {
        let store = InMemoryDialogStore::new();
        assert_eq!(store.get(42).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let store = InMemoryDialogStore::new();
        store
            .set(1, DialogState::AwaitingInput(DialogKind::TaskDetails))
            .await;
        assert_eq!(
            store.get(1).await,
            DialogState::AwaitingInput(DialogKind::TaskDetails)
        );
        store.clear(1).await;
        assert!(store.get(1).await.is_idle());
        assert_eq!(store.open_dialogs().await, 0);
    }

    #[tokio::test]
    async fn test_states_are_per_user() {
        let store = InMemoryDialogStore::new();
        store
            .set(1, DialogState::AwaitingInput(DialogKind::TaskDetails))
            .await;
        store
            .set(2, DialogState::AwaitingInput(DialogKind::HabitDetails))
            .await;
        store.clear(1).await;
        assert!(store.get(1).await.is_idle());
        assert_eq!(
            store.get(2).await,
            DialogState::AwaitingInput(DialogKind::HabitDetails)
        );
    }

    #[tokio::test]
    async fn test_setting_idle_removes_entry() {
        let store = InMemoryDialogStore::new();
        store
            .set(7, DialogState::AwaitingInput(DialogKind::HabitDetails))
            .await;
        store.set(7, DialogState::Idle).await;
        assert_eq!(store.open_dialogs().await, 0);
    }
}
