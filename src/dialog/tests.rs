use super::*;
use crate::test_support::{day, test_store};
use taskbot_core::dialog::InMemoryDialogStore;

#[test]
fn test_parse_task_example() {
    let d = parse_task_details("Finish project 2024-12-15").unwrap();
    assert_eq!(d.title, "Finish project");
    assert_eq!(d.deadline, day("2024-12-15"));
}

#[test]
fn test_parse_task_trims_title_and_input() {
    let d = parse_task_details("  Call   mom  \t2025-01-02  ").unwrap();
    assert_eq!(d.title, "Call   mom");
    assert_eq!(d.deadline, day("2025-01-02"));
}

#[test]
fn test_parse_task_rejects_missing_date() {
    assert_eq!(
        parse_task_details("no date here"),
        Err(DialogParseError::TaskFormat)
    );
    assert_eq!(
        parse_task_details("2024-12-15"),
        Err(DialogParseError::TaskFormat)
    );
    assert_eq!(parse_task_details(""), Err(DialogParseError::TaskFormat));
}

#[test]
fn test_parse_task_date_must_end_input() {
    assert_eq!(
        parse_task_details("Pay rent 2024-12-15 please"),
        Err(DialogParseError::TaskFormat)
    );
}

#[test]
fn test_parse_task_rejects_bad_dates() {
    for input in [
        "Pay rent 2024-02-30",
        "Pay rent 2024-13-01",
        "Pay rent 2024-1-5",
        "Pay rent 24-01-05",
        "Pay rent 2024/01/05",
    ] {
        assert_eq!(
            parse_task_details(input),
            Err(DialogParseError::TaskFormat),
            "{input}"
        );
    }
}

#[test]
fn test_parse_task_accepts_leap_day() {
    let d = parse_task_details("Leap 2024-02-29").unwrap();
    assert_eq!(d.deadline, day("2024-02-29"));
}

#[test]
fn test_parse_habit_example() {
    let d = parse_habit_details("Exercise - daily").unwrap();
    assert_eq!(d.title, "Exercise");
    assert_eq!(d.frequency, "daily");
}

#[test]
fn test_parse_habit_whitespace_insignificant() {
    let d = parse_habit_details("Read a book-every evening ").unwrap();
    assert_eq!(d.title, "Read a book");
    assert_eq!(d.frequency, "every evening");
}

#[test]
fn test_parse_habit_splits_at_last_hyphen() {
    let d = parse_habit_details("Read 5-10 pages - daily").unwrap();
    assert_eq!(d.title, "Read 5-10 pages");
    assert_eq!(d.frequency, "daily");
}

#[test]
fn test_parse_habit_empty_frequency() {
    assert_eq!(
        parse_habit_details("Exercise -"),
        Err(DialogParseError::EmptyFrequency)
    );
    assert_eq!(
        parse_habit_details("Exercise -   "),
        Err(DialogParseError::EmptyFrequency)
    );
}

#[test]
fn test_parse_habit_format_errors() {
    assert_eq!(
        parse_habit_details("Exercise daily"),
        Err(DialogParseError::HabitFormat)
    );
    assert_eq!(
        parse_habit_details("  - daily"),
        Err(DialogParseError::HabitFormat)
    );
}

#[tokio::test]
async fn test_reply_without_dialog_is_ignored() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    assert!(handle_reply(&store, &dialogs, 1, "Finish project 2024-12-15")
        .await
        .is_none());
}

#[tokio::test]
async fn test_task_dialog_creates_task() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    store.register_user(1, None).await.unwrap();

    let prompt = start(&dialogs, 1, DialogKind::TaskDetails).await;
    assert_eq!(prompt, messages::TASK_PROMPT);
    assert_eq!(
        dialogs.get(1).await,
        DialogState::AwaitingInput(DialogKind::TaskDetails)
    );

    let reply = handle_reply(&store, &dialogs, 1, "Finish project 2024-12-15")
        .await
        .unwrap();
    assert_eq!(
        reply,
        messages::task_added("Finish project", day("2024-12-15"))
    );
    assert!(dialogs.get(1).await.is_idle());

    let tasks = store.pending_tasks_for(1).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Finish project");
    assert_eq!(tasks[0].deadline, day("2024-12-15"));
}

#[tokio::test]
async fn test_task_dialog_format_error_clears_state() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    store.register_user(1, None).await.unwrap();

    start(&dialogs, 1, DialogKind::TaskDetails).await;
    let reply = handle_reply(&store, &dialogs, 1, "no date here")
        .await
        .unwrap();
    assert_eq!(reply, messages::TASK_FORMAT_ERROR);
    assert!(dialogs.get(1).await.is_idle());
    assert!(store.pending_tasks_for(1).await.unwrap().is_empty());

    // The follow-up is no longer treated as dialog input.
    assert!(handle_reply(&store, &dialogs, 1, "Finish project 2024-12-15")
        .await
        .is_none());
}

#[tokio::test]
async fn test_task_dialog_unregistered_user_gets_save_failure() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();

    start(&dialogs, 5, DialogKind::TaskDetails).await;
    let reply = handle_reply(&store, &dialogs, 5, "Finish project 2024-12-15")
        .await
        .unwrap();
    assert_eq!(reply, messages::SAVE_FAILED);
    assert!(dialogs.get(5).await.is_idle());
}

#[tokio::test]
async fn test_habit_dialog_creates_habit() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    store.register_user(1, None).await.unwrap();

    start(&dialogs, 1, DialogKind::HabitDetails).await;
    let reply = handle_reply(&store, &dialogs, 1, "Exercise - daily")
        .await
        .unwrap();
    assert_eq!(reply, messages::habit_added("Exercise", "daily"));
    assert!(dialogs.get(1).await.is_idle());

    let habits = store.habits_for(1).await.unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].title, "Exercise");
    assert_eq!(habits[0].frequency, "daily");
    assert_eq!(habits[0].streak, 0);
}

#[tokio::test]
async fn test_habit_dialog_empty_frequency() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    store.register_user(1, None).await.unwrap();

    start(&dialogs, 1, DialogKind::HabitDetails).await;
    let reply = handle_reply(&store, &dialogs, 1, "Exercise -")
        .await
        .unwrap();
    assert_eq!(reply, messages::HABIT_EMPTY_FREQUENCY);
    assert!(dialogs.get(1).await.is_idle());
    assert!(store.habits_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dialogs_are_per_user() {
    let store = test_store().await;
    let dialogs = InMemoryDialogStore::new();
    store.register_user(1, None).await.unwrap();
    store.register_user(2, None).await.unwrap();

    start(&dialogs, 1, DialogKind::TaskDetails).await;
    // User 2's plain text is not captured by user 1's dialog.
    assert!(handle_reply(&store, &dialogs, 2, "Finish project 2024-12-15")
        .await
        .is_none());
    assert!(store.pending_tasks_for(2).await.unwrap().is_empty());
    assert_eq!(
        dialogs.get(1).await,
        DialogState::AwaitingInput(DialogKind::TaskDetails)
    );
}
