//! Periodic task domain types.
//!
//! A task is started through [`TickerPort`](crate::ports::TickerPort) and
//! yields a [`TaskHandle`] to its owner. The worker side reports progress as
//! [`TickEvent`]s through a [`TickSink`]; the owner decides on the delivery
//! context whether an event still belongs to a live handle.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ProgressConfig;
use crate::error::{ConfigError, TaskError};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one started task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Lifecycle of a started task.
///
/// `Running` is the only non-terminal state. Once a handle leaves it, it never
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Completed,
    Cancelled,
    /// The worker infrastructure failed; see [`TaskError`].
    Failed,
}

impl TaskState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// What a task should emit: `0..total_ticks`, one value per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub total_ticks: u32,
    pub interval: Duration,
}

impl TickSchedule {
    pub const fn new(total_ticks: u32, interval: Duration) -> Self {
        Self {
            total_ticks,
            interval,
        }
    }

    /// Same rules as [`ProgressConfig::validate`]: at least one tick, and a
    /// non-zero spacing between ticks.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.total_ticks == 0 {
            return Err(ConfigError::ZeroTicks);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

impl TryFrom<&ProgressConfig> for TickSchedule {
    type Error = ConfigError;

    fn try_from(config: &ProgressConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self::new(config.total_ticks, config.tick_interval()))
    }
}

/// Owned handle to a running task.
///
/// The handle is the source of truth for "is this task still live". Worker
/// events are only honoured while the handle reports [`is_active`](Self::is_active).
/// Dropping a handle that is still running cancels the worker.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    state: TaskState,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    /// Wrap a freshly spawned worker. The handle starts out `Running`.
    pub const fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self {
            id,
            state: TaskState::Running,
            cancel_token,
        }
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Whether the task has neither completed, failed nor been cancelled.
    pub const fn is_active(&self) -> bool {
        matches!(self.state, TaskState::Running)
    }

    /// Cancel the task.
    ///
    /// The handle is marked `Cancelled` before this returns, so any tick the
    /// worker has already posted is rejected on delivery. Returns `false` if
    /// the task had already finished.
    pub fn cancel(&mut self) -> bool {
        if !self.finish(TaskState::Cancelled) {
            return false;
        }
        self.cancel_token.cancel();
        true
    }

    /// Record natural completion, as observed on the delivery context.
    pub fn mark_completed(&mut self) -> bool {
        self.finish(TaskState::Completed)
    }

    /// Record an infrastructure failure, as observed on the delivery context.
    pub fn mark_failed(&mut self) -> bool {
        let finished = self.finish(TaskState::Failed);
        if finished {
            self.cancel_token.cancel();
        }
        finished
    }

    fn finish(&mut self, terminal: TaskState) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = terminal;
        true
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if self.is_active() {
            self.cancel_token.cancel();
        }
    }
}

/// One delivery from a task worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvent {
    pub task_id: TaskId,
    pub kind: TickEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEventKind {
    /// Zero-based index of the emitted tick.
    Tick(u32),
    Completed,
    Failed(TaskError),
}

impl TickEvent {
    pub const fn tick(task_id: TaskId, index: u32) -> Self {
        Self {
            task_id,
            kind: TickEventKind::Tick(index),
        }
    }

    pub const fn completed(task_id: TaskId) -> Self {
        Self {
            task_id,
            kind: TickEventKind::Completed,
        }
    }

    pub const fn failed(task_id: TaskId, error: TaskError) -> Self {
        Self {
            task_id,
            kind: TickEventKind::Failed(error),
        }
    }
}

/// Worker-side outlet for [`TickEvent`]s.
///
/// Implementations forward the event onto the delivery context. `deliver`
/// returns `false` once that context is gone, which tells the worker to stop.
#[derive(Clone)]
pub struct TickSink {
    deliver: Arc<dyn Fn(TickEvent) -> bool + Send + Sync>,
}

impl TickSink {
    pub fn new<F>(deliver: F) -> Self
    where
        F: Fn(TickEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    pub fn deliver(&self, event: TickEvent) -> bool {
        (self.deliver)(event)
    }
}

impl fmt::Debug for TickSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickSink").finish_non_exhaustive()
    }
}
