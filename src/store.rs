//! The ordered task list and its refresh loop.
//!
//! `TaskStore` owns the tasks, a [`Clock`] and a [`RefreshTimer`]. The front
//! end drives it from a single thread: user actions call [`TaskStore::add`]
//! and [`TaskStore::remove`], and the event loop calls
//! [`TaskStore::poll_refresh`] on every pass so the countdowns stay current.
//! Dropping the store stops the timer.

use chrono::{DateTime, Local};
use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::refresh::RefreshTimer;
use crate::task::Task;

/// In-memory, insertion-ordered list of tasks.
#[derive(Debug)]
pub struct TaskStore<C: Clock = SystemClock> {
    tasks: Vec<Task>,
    clock: C,
    timer: RefreshTimer,
}

impl TaskStore<SystemClock> {
    /// Create an empty store on the system wall clock.
    pub fn new() -> Self {
        TaskStore::with_clock(SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    /// Create an empty store reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        TaskStore {
            tasks: Vec::new(),
            clock,
            timer: RefreshTimer::default(),
        }
    }

    /// Append a task due at `due`.
    ///
    /// Ignored when `name` is empty or no due date was chosen.
    pub fn add(&mut self, name: &str, due: Option<DateTime<Local>>) -> Option<&Task> {
        let due = match due {
            Some(due) if !name.is_empty() => due,
            _ => {
                debug!(name, has_due = due.is_some(), "ignoring incomplete task");
                return None;
            }
        };
        let task = Task::new(name, due, self.clock.now());
        debug!(name, %due, index = self.tasks.len(), "task added");
        self.tasks.push(task);
        self.tasks.last()
    }

    /// Remove the task at `index`. Out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            debug!(index, len = self.tasks.len(), "ignoring remove past end");
            return None;
        }
        let task = self.tasks.remove(index);
        debug!(index, name = task.name(), "task removed");
        Some(task)
    }

    /// Recompute every task's derived fields as seen at `now`.
    pub fn tick(&mut self, now: DateTime<Local>) {
        trace!(tasks = self.tasks.len(), %now, "tick");
        for task in &mut self.tasks {
            task.refresh(now);
        }
    }

    /// Start ticking once per refresh interval.
    pub fn start_refresh(&mut self) {
        self.timer.start(self.clock.now());
        info!(
            interval_ms = self.timer.interval().num_milliseconds(),
            "refresh started"
        );
    }

    /// Stop ticking. No tick runs after this until the refresh is restarted.
    pub fn stop_refresh(&mut self) {
        if self.timer.stop() {
            info!("refresh stopped");
        }
    }

    #[cfg(test)]
    pub fn is_refreshing(&self) -> bool {
        self.timer.is_active()
    }

    /// Run a tick if one is due. Returns whether the tasks were recomputed.
    pub fn poll_refresh(&mut self) -> bool {
        let now = self.clock.now();
        if !self.timer.poll(now) {
            return false;
        }
        self.tick(now);
        true
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }
}

impl<C: Clock> Drop for TaskStore<C> {
    fn drop(&mut self) {
        self.stop_refresh();
    }
}
