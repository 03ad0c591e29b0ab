//! The UI-affinity delivery context.
//!
//! Every view mutation runs on whatever drives a [`UiLoop`]. Workers never
//! touch presenter state directly; they [`post`](UiHandle::post) a job and the
//! loop runs it in order. Jobs posted from one thread run in the order they
//! were posted.

use tokio::sync::mpsc;
use tracing::trace;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable posting side of a [`UiLoop`].
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl UiHandle {
    /// Queue a job on the loop. Returns `false` if the loop has been closed
    /// or dropped, in which case the job is discarded.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Box::new(job)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Single-consumer job queue standing in for the UI thread.
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<Job>,
    handle: UiHandle,
}

impl Default for UiLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl UiLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            handle: UiHandle { tx },
        }
    }

    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Run every job that is already queued, without waiting.
    ///
    /// Returns the number of jobs run. Jobs posted by those jobs are picked
    /// up in the same call.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        if ran > 0 {
            trace!(jobs = ran, "Drained UI loop");
        }
        ran
    }

    /// Wait for the next job and run it.
    ///
    /// Returns `false` once the loop is closed and drained.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Stop accepting new jobs. Already queued jobs can still be drained.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_jobs_run_in_post_order() {
        let mut ui = UiLoop::new();
        let handle = ui.handle();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            assert!(handle.post(move || order.lock().unwrap().push(i)));
        }

        assert_eq!(ui.run_pending(), 5);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_run_pending_on_empty_loop() {
        let mut ui = UiLoop::new();
        assert_eq!(ui.run_pending(), 0);
    }

    #[test]
    fn test_post_after_close_is_rejected() {
        let mut ui = UiLoop::new();
        let handle = ui.handle();
        ui.close();

        assert!(handle.is_closed());
        assert!(!handle.post(|| panic!("should never run")));
        assert_eq!(ui.run_pending(), 0);
    }

    #[test]
    fn test_post_after_drop_is_rejected() {
        let ui = UiLoop::new();
        let handle = ui.handle();
        drop(ui);

        assert!(!handle.post(|| {}));
    }

    #[tokio::test]
    async fn test_run_next_waits_for_job() {
        let mut ui = UiLoop::new();
        let handle = ui.handle();
        let hit = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&hit);

        tokio::spawn(async move {
            handle.post(move || *flag.lock().unwrap() = true);
        });

        assert!(ui.run_next().await);
        assert!(*hit.lock().unwrap());
    }

    #[tokio::test]
    async fn test_run_next_after_close_drains_then_stops() {
        let mut ui = UiLoop::new();
        ui.handle().post(|| {});
        ui.close();

        assert!(ui.run_next().await);
        assert!(!ui.run_next().await);
    }
}
