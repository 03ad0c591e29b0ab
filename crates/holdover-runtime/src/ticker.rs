//! Interval-driven tick workers.
//!
//! One worker per started task. The worker sleeps one interval, emits tick
//! `0`, and so on up to `total_ticks - 1`, then reports completion. It is
//! policy-free: it does not know about views or presenters, only the sink.

use std::any::Any;

use holdover_core::{
    TaskError, TaskHandle, TaskId, TickEvent, TickSchedule, TickSink, TickerPort,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// [`TickerPort`] backed by `tokio::time::interval`.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    runtime: Handle,
}

impl IntervalTicker {
    /// Spawn workers on the given runtime.
    pub const fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Spawn workers on the runtime this is called from.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TickerPort for IntervalTicker {
    fn start(&self, schedule: TickSchedule, sink: TickSink) -> TaskHandle {
        let id = TaskId::next();
        let cancel_token = CancellationToken::new();

        let worker = self
            .runtime
            .spawn(run_ticks(id, schedule, sink.clone(), cancel_token.clone()));
        self.runtime.spawn(supervise(id, worker, sink, cancel_token.clone()));

        TaskHandle::new(id, cancel_token)
    }
}

async fn run_ticks(
    id: TaskId,
    schedule: TickSchedule,
    sink: TickSink,
    cancel_token: CancellationToken,
) {
    if let Err(err) = schedule.validate() {
        warn!(task_id = %id, error = %err, "Rejecting tick schedule");
        sink.deliver(TickEvent::failed(id, err.into()));
        return;
    }

    let mut ticker = interval_at(Instant::now() + schedule.interval, schedule.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(
        task_id = %id,
        total = schedule.total_ticks,
        interval = ?schedule.interval,
        "Starting tick worker"
    );

    for index in 0..schedule.total_ticks {
        tokio::select! {
            biased;
            () = cancel_token.cancelled() => {
                debug!(task_id = %id, emitted = index, "Tick worker cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        if !sink.deliver(TickEvent::tick(id, index)) {
            debug!(task_id = %id, "Delivery context closed; stopping tick worker");
            return;
        }
    }

    if cancel_token.is_cancelled() {
        return;
    }
    sink.deliver(TickEvent::completed(id));
    debug!(task_id = %id, "Tick worker completed");
}

/// Turn an abnormal worker exit into a failure event.
async fn supervise(
    id: TaskId,
    worker: JoinHandle<()>,
    sink: TickSink,
    cancel_token: CancellationToken,
) {
    let Err(err) = worker.await else {
        return;
    };

    let error = if err.is_panic() {
        TaskError::WorkerPanicked(panic_message(err.into_panic().as_ref()))
    } else if cancel_token.is_cancelled() {
        return;
    } else {
        TaskError::Aborted
    };

    warn!(task_id = %id, error = %error, "Tick worker ended abnormally");
    sink.deliver(TickEvent::failed(id, error));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdover_core::{ConfigError, TickEventKind};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn channel_sink() -> (TickSink, mpsc::UnboundedReceiver<TickEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TickSink::new(move |event| tx.send(event).is_ok()), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_all_ticks_then_completes() {
        let ticker = IntervalTicker::current();
        let (sink, mut rx) = channel_sink();
        let started = Instant::now();

        let handle = ticker.start(TickSchedule::new(3, Duration::from_millis(100)), sink);
        let id = handle.id();

        assert_eq!(rx.recv().await, Some(TickEvent::tick(id, 0)));
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(started.elapsed() < Duration::from_millis(150));
        assert_eq!(rx.recv().await, Some(TickEvent::tick(id, 1)));
        assert_eq!(rx.recv().await, Some(TickEvent::tick(id, 2)));
        assert_eq!(rx.recv().await, Some(TickEvent::completed(id)));
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(started.elapsed() < Duration::from_millis(350));
        assert!(handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_emission() {
        let ticker = IntervalTicker::current();
        let (sink, mut rx) = channel_sink();

        let mut handle = ticker.start(TickSchedule::new(10, Duration::from_millis(100)), sink);
        assert_eq!(rx.recv().await, Some(TickEvent::tick(handle.id(), 0)));

        assert!(handle.cancel());
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        // Worker and supervisor are gone, dropping their senders
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_worker() {
        let ticker = IntervalTicker::current();
        let (sink, mut rx) = channel_sink();

        let handle = ticker.start(TickSchedule::new(10, Duration::from_millis(100)), sink);
        drop(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_sink_stops_worker() {
        let ticker = IntervalTicker::current();
        let (sink, rx) = channel_sink();
        drop(rx);

        let handle = ticker.start(TickSchedule::new(10, Duration::from_millis(100)), sink);
        tokio::time::sleep(Duration::from_secs(5)).await;

        // The worker gave up on its own; nothing cancelled it
        assert!(handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_panic_is_reported_as_failure() {
        let ticker = IntervalTicker::current();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = TickSink::new(move |event: TickEvent| {
            if event.kind == TickEventKind::Tick(1) {
                panic!("sink exploded");
            }
            tx.send(event).is_ok()
        });

        let handle = ticker.start(TickSchedule::new(5, Duration::from_millis(10)), sink);
        let id = handle.id();

        assert_eq!(rx.recv().await, Some(TickEvent::tick(id, 0)));
        assert_eq!(
            rx.recv().await,
            Some(TickEvent::failed(
                id,
                TaskError::WorkerPanicked("sink exploded".to_string())
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_fails_without_panicking() {
        let ticker = IntervalTicker::current();
        let (sink, mut rx) = channel_sink();

        let handle = ticker.start(TickSchedule::new(5, Duration::ZERO), sink);

        assert_eq!(
            rx.recv().await,
            Some(TickEvent::failed(
                handle.id(),
                TaskError::InvalidSchedule(ConfigError::ZeroInterval)
            ))
        );
        // Worker exited normally, so the supervisor adds nothing
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
