//! Progress presenter: owns the periodic task and pushes its state to a view.
//!
//! The presenter outlives individual views. While a view is bound every task
//! event is rendered; while unbound the task keeps running and only the
//! bookkeeping advances. Only [`Presenter::destroy`] stops the work.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace, warn};

use crate::config::ProgressConfig;
use crate::ports::{Presenter, ProgressView, TickerPort};
use crate::task::{TaskHandle, TickEvent, TickEventKind, TickSchedule, TickSink};
use crate::ui::UiHandle;

/// One call on the [`ProgressView`] port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    Progress(u32),
    ProgressVisible(bool),
    TriggerEnabled(bool),
}

impl ViewUpdate {
    pub fn apply(self, view: &dyn ProgressView) {
        match self {
            Self::Progress(value) => view.set_progress(value),
            Self::ProgressVisible(visible) => view.set_progress_visible(visible),
            Self::TriggerEnabled(enabled) => view.set_trigger_enabled(enabled),
        }
    }
}

/// Point-in-time view of presenter state, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Last progress value pushed (or that would have been pushed).
    pub progress: u32,
    pub total: u32,
    pub running: bool,
    pub view_bound: bool,
    pub destroyed: bool,
}

#[derive(Default)]
struct PresenterState {
    view: Option<Arc<dyn ProgressView>>,
    task: Option<TaskHandle>,
    progress: u32,
    destroyed: bool,
}

impl PresenterState {
    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(TaskHandle::is_active)
    }
}

/// Presenter for a screen with a progress indicator and a start control.
pub struct ProgressPresenter {
    config: ProgressConfig,
    ticker: Arc<dyn TickerPort>,
    ui: UiHandle,
    this: Weak<Self>,
    state: Mutex<PresenterState>,
}

impl ProgressPresenter {
    /// Create a presenter whose task events are delivered on `ui`.
    ///
    /// An invalid `config` is not rejected here; the trigger refuses to start
    /// a run with it and the screen stays idle.
    pub fn new(config: ProgressConfig, ticker: Arc<dyn TickerPort>, ui: UiHandle) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            config,
            ticker,
            ui,
            this: this.clone(),
            state: Mutex::new(PresenterState::default()),
        })
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.lock();
        ProgressSnapshot {
            progress: state.progress,
            total: self.config.total_ticks,
            running: state.is_running(),
            view_bound: state.view.is_some(),
            destroyed: state.destroyed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// Apply a task event. Must run on the delivery context.
    ///
    /// Events from a task other than the live one, or arriving after the live
    /// task was cancelled, are dropped.
    pub fn deliver(&self, event: TickEvent) {
        let (view, updates) = {
            let mut guard = self.lock();
            let state = &mut *guard;

            let Some(task) = state.task.as_mut().filter(|t| t.id() == event.task_id) else {
                trace!(task_id = %event.task_id, "Dropping event from stale task");
                return;
            };
            if !task.is_active() {
                trace!(task_id = %event.task_id, "Dropping event from finished task");
                return;
            }

            let updates = match event.kind {
                TickEventKind::Tick(index) => {
                    state.progress = index.saturating_add(1);
                    trace!(task_id = %event.task_id, progress = state.progress, "Progress tick");
                    vec![ViewUpdate::Progress(state.progress)]
                }
                TickEventKind::Completed => {
                    task.mark_completed();
                    state.task = None;
                    state.progress = self.config.total_ticks;
                    debug!(task_id = %event.task_id, "Progress task completed");
                    let mut updates = vec![ViewUpdate::Progress(state.progress)];
                    updates.extend(in_progress_updates(false));
                    updates
                }
                TickEventKind::Failed(err) => {
                    task.mark_failed();
                    state.task = None;
                    debug!(task_id = %event.task_id, error = %err, "Progress task failed; ignoring");
                    Vec::new()
                }
            };

            (state.view.clone(), updates)
        };

        push(view.as_deref(), &updates);
    }

    fn tick_sink(&self) -> TickSink {
        let this = self.this.clone();
        let ui = self.ui.clone();
        TickSink::new(move |event| {
            let this = this.clone();
            ui.post(move || {
                if let Some(presenter) = this.upgrade() {
                    presenter.deliver(event);
                }
            })
        })
    }

    fn lock(&self) -> MutexGuard<'_, PresenterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Presenter for ProgressPresenter {
    fn bind_view(&self, view: Arc<dyn ProgressView>) {
        let running = {
            let mut state = self.lock();
            if state.destroyed {
                debug!("Ignoring view bind on destroyed presenter");
                return;
            }
            state.view = Some(Arc::clone(&view));
            state.is_running()
        };

        trace!(running, "View bound");
        if running {
            push(Some(view.as_ref()), &in_progress_updates(true));
        }
    }

    fn unbind_view(&self) {
        if self.lock().view.take().is_some() {
            trace!("View unbound");
        }
    }

    fn destroy(&self) {
        let task = {
            let mut state = self.lock();
            state.view = None;
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.task.take()
        };

        if let Some(mut task) = task {
            if task.cancel() {
                debug!(task_id = %task.id(), "Cancelled progress task on destroy");
            }
        }
        debug!("Presenter destroyed");
    }

    fn on_trigger_action(&self) {
        let (view, updates) = {
            let mut state = self.lock();
            if state.destroyed {
                debug!("Ignoring trigger on destroyed presenter");
                return;
            }
            if state.is_running() {
                debug!("Ignoring trigger while a progress task is running");
                return;
            }
            let schedule = match TickSchedule::try_from(&self.config) {
                Ok(schedule) => schedule,
                Err(err) => {
                    warn!(error = %err, "Ignoring trigger; progress config is invalid");
                    return;
                }
            };

            let handle = self.ticker.start(schedule, self.tick_sink());
            debug!(
                task_id = %handle.id(),
                total = self.config.total_ticks,
                interval_ms = self.config.tick_interval_ms,
                "Started progress task"
            );

            state.task = Some(handle);
            state.progress = 0;

            let mut updates = in_progress_updates(true).to_vec();
            updates.push(ViewUpdate::Progress(0));
            (state.view.clone(), updates)
        };

        push(view.as_deref(), &updates);
    }
}

/// Visibility and trigger state for "work in flight" (`true`) or idle.
const fn in_progress_updates(show: bool) -> [ViewUpdate; 2] {
    [
        ViewUpdate::ProgressVisible(show),
        ViewUpdate::TriggerEnabled(!show),
    ]
}

fn push(view: Option<&dyn ProgressView>, updates: &[ViewUpdate]) {
    if let Some(view) = view {
        for update in updates {
            update.apply(view);
        }
    }
}
