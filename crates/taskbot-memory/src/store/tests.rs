use super::*;
use crate::models::{HabitCheck, TaskStatus};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use taskbot_core::error::PersistenceError;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

/// Whether a `users` row exists for `chat_id`.
async fn user_exists(store: &Store, chat_id: i64) -> bool {
    match store
        .execute("SELECT 1 FROM users WHERE chat_id = ?", &[Param::Int(chat_id)])
        .await
        .unwrap()
    {
        Executed::Rows(rows) => !rows.is_empty(),
        Executed::Done { .. } => panic!("select should return rows"),
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_register_is_idempotent() {
    let store = test_store().await;
    assert!(store.register_user(100, Some("alice")).await.unwrap());
    assert!(!store.register_user(100, Some("alice")).await.unwrap());
    assert!(!store.register_user(100, None).await.unwrap());

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.users, 1);
    assert!(user_exists(&store, 100).await);
    assert!(!user_exists(&store, 200).await);
}

#[tokio::test]
async fn test_add_and_list_pending_tasks() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    store
        .add_task(1, "Later", day("2024-12-20"))
        .await
        .unwrap();
    store
        .add_task(1, "Finish project", day("2024-12-15"))
        .await
        .unwrap();

    let tasks = store.pending_tasks_for(1).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Finish project");
    assert_eq!(tasks[0].deadline, day("2024-12-15"));
    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[1].title, "Later");
}

#[tokio::test]
async fn test_task_requires_registered_owner() {
    let store = test_store().await;
    let err = store
        .add_task(999, "Orphan", day("2024-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TaskbotError::Persistence(PersistenceError::Query(_))
    ));
    assert!(store.pending_tasks_for(999).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_habit_requires_registered_owner() {
    let store = test_store().await;
    assert!(store.add_habit(999, "Run", "daily").await.is_err());
}

#[tokio::test]
async fn test_tasks_due_on_filters_date_and_status() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    store.register_user(2, None).await.unwrap();
    let due = store.add_task(1, "Due", day("2024-06-01")).await.unwrap();
    store.add_task(2, "Tomorrow", day("2024-06-02")).await.unwrap();
    let done = store.add_task(2, "Done already", day("2024-06-01")).await.unwrap();
    assert!(store.complete_task(2, done).await.unwrap());

    let tasks = store.tasks_due_on(day("2024-06-01")).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, due);
    assert_eq!(tasks[0].owner, 1);
}

#[tokio::test]
async fn test_complete_task_checks_owner() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    store.register_user(2, None).await.unwrap();
    let id = store.add_task(1, "Mine", day("2024-06-01")).await.unwrap();

    assert!(!store.complete_task(2, id).await.unwrap());
    assert!(store.complete_task(1, id).await.unwrap());
    // Already done.
    assert!(!store.complete_task(1, id).await.unwrap());
    assert!(store.pending_tasks_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_habit_defaults() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    store.add_habit(1, "Exercise", "daily").await.unwrap();

    let habits = store.habits_for(1).await.unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].title, "Exercise");
    assert_eq!(habits[0].frequency, "daily");
    assert_eq!(habits[0].streak, 0);
    assert!(habits[0].last_checked.is_none());
}

#[tokio::test]
async fn test_check_habit_streaks() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    let id = store.add_habit(1, "Read", "daily").await.unwrap();

    assert_eq!(
        store.check_habit(1, id, day("2024-03-01")).await.unwrap(),
        HabitCheck::Counted(1)
    );
    assert_eq!(
        store.check_habit(1, id, day("2024-03-01")).await.unwrap(),
        HabitCheck::AlreadyChecked(1)
    );
    assert_eq!(
        store.check_habit(1, id, day("2024-03-02")).await.unwrap(),
        HabitCheck::Counted(2)
    );
    // Gap of a day restarts the streak.
    assert_eq!(
        store.check_habit(1, id, day("2024-03-04")).await.unwrap(),
        HabitCheck::Counted(1)
    );

    let habit = &store.habits_for(1).await.unwrap()[0];
    assert_eq!(habit.streak, 1);
    assert_eq!(habit.last_checked, Some(day("2024-03-04")));
}

#[tokio::test]
async fn test_check_weekly_habit_builds_streak() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    let id = store.add_habit(1, "Yoga", "every Monday").await.unwrap();

    assert_eq!(
        store.check_habit(1, id, day("2024-03-04")).await.unwrap(),
        HabitCheck::Counted(1)
    );
    assert_eq!(
        store.check_habit(1, id, day("2024-03-11")).await.unwrap(),
        HabitCheck::Counted(2)
    );

    let habit = &store.habits_for(1).await.unwrap()[0];
    assert_eq!(habit.current_streak(day("2024-03-13")), 2);

    // Missing a whole week breaks the chain.
    assert_eq!(
        store.check_habit(1, id, day("2024-03-26")).await.unwrap(),
        HabitCheck::Counted(1)
    );
}

#[tokio::test]
async fn test_execute_debug_shows_counts() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    let rows = store.execute("SELECT chat_id FROM users", &[]).await.unwrap();
    assert_eq!(format!("{rows:?}"), "Rows(1)");
    let done = store
        .execute("DELETE FROM users WHERE chat_id = ?", &[Param::Int(1)])
        .await
        .unwrap();
    assert_eq!(format!("{done:?}"), "Done { rows_affected: 1 }");
}

#[tokio::test]
async fn test_check_habit_other_owner_not_found() {
    let store = test_store().await;
    store.register_user(1, None).await.unwrap();
    store.register_user(2, None).await.unwrap();
    let id = store.add_habit(1, "Read", "daily").await.unwrap();
    assert_eq!(
        store.check_habit(2, id, day("2024-03-01")).await.unwrap(),
        HabitCheck::NotFound
    );
}

#[tokio::test]
async fn test_execute_read_returns_rows() {
    let store = test_store().await;
    store.register_user(5, Some("bob")).await.unwrap();

    let out = store
        .execute(
            "SELECT display_name FROM users WHERE chat_id = ?",
            &[Param::Int(5)],
        )
        .await
        .unwrap();
    match out {
        Executed::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            let name: String = rows[0].try_get(0).unwrap();
            assert_eq!(name, "bob");
        }
        Executed::Done { .. } => panic!("select should return rows"),
    }
}

#[tokio::test]
async fn test_execute_write_commits() {
    let store = test_store().await;
    let out = store
        .execute(
            "INSERT INTO users (chat_id, display_name) VALUES (?, ?)",
            &[Param::Int(9), Param::Null],
        )
        .await
        .unwrap();
    assert!(matches!(out, Executed::Done { rows_affected: 1 }));
    assert!(user_exists(&store, 9).await);
}

#[tokio::test]
async fn test_execute_bad_sql_is_query_error() {
    let store = test_store().await;
    let err = store.execute("SELECT * FROM nope", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        TaskbotError::Persistence(PersistenceError::Query(_))
    ));
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(store.pool()).await.unwrap();
    let out = store
        .execute("SELECT COUNT(*) FROM _migrations", &[])
        .await
        .unwrap();
    let Executed::Rows(rows) = out else {
        panic!("expected rows");
    };
    let applied: i64 = rows[0].try_get(0).unwrap();
    assert_eq!(applied, 2);
}

#[test]
fn test_is_read_statement() {
    assert!(is_read_statement("SELECT 1"));
    assert!(is_read_statement("  select * from users"));
    assert!(is_read_statement("WITH x AS (SELECT 1) SELECT * FROM x"));
    assert!(is_read_statement("PRAGMA page_count"));
    assert!(!is_read_statement("INSERT INTO users (chat_id) VALUES (1)"));
    assert!(!is_read_statement("UPDATE tasks SET status = 'done'"));
    assert!(!is_read_statement("selection"));
}

#[tokio::test]
async fn test_store_new_on_disk() {
    let dir = std::env::temp_dir().join(format!("__taskbot_store_test_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = MemoryConfig {
        db_path: dir.join("nested/test.db").to_string_lossy().to_string(),
        max_connections: 2,
    };
    let store = Store::new(&config).await.unwrap();
    store.register_user(1, None).await.unwrap();
    assert_eq!(store.counts().await.unwrap().users, 1);
    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_store_new_in_memory_leaves_no_file() {
    let config = MemoryConfig {
        db_path: ":memory:".to_string(),
        max_connections: 1,
    };
    let store = Store::new(&config).await.unwrap();
    store.register_user(1, None).await.unwrap();
    assert_eq!(store.counts().await.unwrap().users, 1);
    assert!(!std::path::Path::new(":memory:").exists());
}
