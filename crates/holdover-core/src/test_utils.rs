//! Test doubles for the core ports.
//!
//! Enabled for this crate's unit tests and, through the `test-utils` feature,
//! for downstream crates.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::ports::{ProgressView, TickerPort};
use crate::presenter::ViewUpdate;
use crate::task::{TaskHandle, TaskId, TickEvent, TickSchedule, TickSink};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// View that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewUpdate>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ViewUpdate> {
        lock(&self.calls).clone()
    }

    /// Only the `set_progress` values, in order.
    pub fn progress_values(&self) -> Vec<u32> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                ViewUpdate::Progress(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}

impl ProgressView for RecordingView {
    fn set_progress(&self, value: u32) {
        lock(&self.calls).push(ViewUpdate::Progress(value));
    }

    fn set_progress_visible(&self, visible: bool) {
        lock(&self.calls).push(ViewUpdate::ProgressVisible(visible));
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        lock(&self.calls).push(ViewUpdate::TriggerEnabled(enabled));
    }
}

/// A task started through [`ManualTicker`].
#[derive(Debug, Clone)]
pub struct StartedTask {
    pub id: TaskId,
    pub schedule: TickSchedule,
    pub sink: TickSink,
    pub cancel_token: CancellationToken,
}

/// Ticker that never fires on its own; tests emit events by hand.
///
/// Events are pushed to the sink regardless of cancellation, so tests can
/// reproduce a tick that was already in flight when the task was cancelled.
#[derive(Debug, Default)]
pub struct ManualTicker {
    started: Mutex<Vec<StartedTask>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_count(&self) -> usize {
        lock(&self.started).len()
    }

    /// The `index`-th started task.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `index + 1` tasks were started.
    pub fn task(&self, index: usize) -> StartedTask {
        lock(&self.started)
            .get(index)
            .cloned()
            .unwrap_or_else(|| panic!("no task started at index {index}"))
    }

    pub fn last_schedule(&self) -> Option<TickSchedule> {
        lock(&self.started).last().map(|task| task.schedule)
    }

    pub fn is_cancelled(&self, index: usize) -> bool {
        self.task(index).cancel_token.is_cancelled()
    }

    pub fn emit_tick(&self, index: usize, tick: u32) -> bool {
        let task = self.task(index);
        task.sink.deliver(TickEvent::tick(task.id, tick))
    }

    pub fn complete(&self, index: usize) -> bool {
        let task = self.task(index);
        task.sink.deliver(TickEvent::completed(task.id))
    }

    pub fn fail(&self, index: usize, error: TaskError) -> bool {
        let task = self.task(index);
        task.sink.deliver(TickEvent::failed(task.id, error))
    }

    /// Emit every tick of the schedule, then completion.
    pub fn run_to_completion(&self, index: usize) {
        let task = self.task(index);
        for tick in 0..task.schedule.total_ticks {
            task.sink.deliver(TickEvent::tick(task.id, tick));
        }
        task.sink.deliver(TickEvent::completed(task.id));
    }
}

impl TickerPort for ManualTicker {
    fn start(&self, schedule: TickSchedule, sink: TickSink) -> TaskHandle {
        let id = TaskId::next();
        let cancel_token = CancellationToken::new();
        lock(&self.started).push(StartedTask {
            id,
            schedule,
            sink,
            cancel_token: cancel_token.clone(),
        });
        TaskHandle::new(id, cancel_token)
    }
}

/// Shared [`RecordingView`] ready to hand to a presenter.
pub fn recording_view() -> Arc<RecordingView> {
    Arc::new(RecordingView::new())
}
