//! Daily reminders for tasks due today.

use crate::messages;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taskbot_core::{error::TaskbotError, message::OutgoingMessage, traits::Channel};
use taskbot_memory::Store;
use tracing::{error, info, warn};

/// Sends one reminder per pending task due on a given day.
pub struct ReminderJob {
    store: Store,
    channel: Arc<dyn Channel>,
    running: AtomicBool,
}

/// Delivery counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ReminderReport),
    /// Another run was in progress.
    Skipped,
}

/// Clears the running flag when a run ends, including on early return.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ReminderJob {
    pub fn new(store: Store, channel: Arc<dyn Channel>) -> Self {
        Self {
            store,
            channel,
            running: AtomicBool::new(false),
        }
    }

    /// Remind every owner of a pending task due on `today`.
    ///
    /// A failed send is logged and counted; the rest still go out.
    pub async fn run(&self, today: NaiveDate) -> Result<RunOutcome, TaskbotError> {
        if self.running.swap(true, Ordering::AcqRel) {
            warn!("reminders: previous run still in progress, skipping");
            return Ok(RunOutcome::Skipped);
        }
        let _guard = RunningGuard(&self.running);

        let tasks = self.store.tasks_due_on(today).await?;
        let mut report = ReminderReport::default();

        for task in &tasks {
            let msg = OutgoingMessage::new(task.owner, messages::reminder(&task.title));
            match self.channel.send(msg).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("reminders: failed to remind {} of task {}: {e}", task.owner, task.id);
                    report.failed += 1;
                }
            }
        }

        info!(
            "reminders for {today}: {} due, {} sent, {} failed",
            tasks.len(),
            report.sent,
            report.failed
        );
        Ok(RunOutcome::Completed(report))
    }
}

/// Time from `now` until the next `at` on the wall clock. An `at` equal to
/// `now` counts as tomorrow.
pub fn next_fire_delay(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let mut target = now.date().and_time(at);
    if target <= now {
        target += chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// Background loop: run `job` once per local calendar day at `at`.
pub async fn reminder_loop(job: Arc<ReminderJob>, at: NaiveTime) {
    let mut last_run: Option<NaiveDate> = None;

    loop {
        let delay = next_fire_delay(chrono::Local::now().naive_local(), at);
        tokio::time::sleep(delay).await;

        let today = chrono::Local::now().date_naive();
        if last_run == Some(today) {
            continue;
        }
        last_run = Some(today);

        let job = job.clone();
        tokio::spawn(async move {
            if let Err(e) = job.run(today).await {
                error!("reminders: run for {today} failed: {e}");
            }
        });
    }
}
