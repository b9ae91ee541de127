//! # taskbot-memory
//!
//! Persistent users, tasks, and habits for taskbot (SQLite-backed).

pub mod models;
pub mod store;

pub use models::{Habit, HabitCheck, Task, TaskStatus};
pub use store::{Executed, Param, Store};
