//! Demo runner - the composition root for `holdover run`.
//!
//! Plays the host: creates containers, feeds them lifecycle signals, and
//! drains the UI loop. Every recreation is transient (save-state reported),
//! so the same presenter and its running task carry over to the new screen.
//! Leaving the screen, or reaching the end of the run, is a final teardown.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use holdover_core::{
    Container, ProgressConfig, ProgressPresenter, ProgressView, RetentionStore, TickerPort,
    UiHandle, UiLoop,
};
use holdover_runtime::IntervalTicker;
use tracing::{debug, info};

use crate::view::{BarOutput, TerminalView};

/// Marker type the demo screen is keyed by in the retention store.
struct MainScreen;

/// Inputs for [`run_demo`].
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub config: ProgressConfig,
    /// Progress values at which the screen is recreated.
    pub recreate_at: Vec<u32>,
    /// Progress value at which the screen is left for good.
    pub leave_at: Option<u32>,
    pub output: BarOutput,
}

impl DemoOptions {
    pub const fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            recreate_at: Vec::new(),
            leave_at: None,
            output: BarOutput::Stderr,
        }
    }
}

/// What happened during a demo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoReport {
    /// Last progress value the presenter reached.
    pub final_progress: u32,
    /// Whether the run reached its last tick before the screen was left.
    pub completed: bool,
    /// Transient recreations performed.
    pub recreations: usize,
    /// Presenters built by the container factory.
    pub presenters_created: usize,
    /// Whether the store still held the presenter after the final teardown.
    pub retained_after_exit: bool,
}

/// Run one screen session to completion or until it is left.
pub async fn run_demo(options: DemoOptions) -> Result<DemoReport> {
    options.config.validate().context("invalid progress config")?;

    let store = RetentionStore::new();
    let mut ui = UiLoop::new();
    let ticker: Arc<dyn TickerPort> = Arc::new(IntervalTicker::current());
    let created = Arc::new(AtomicUsize::new(0));

    let factory = ScreenFactory {
        store: store.clone(),
        ui: ui.handle(),
        ticker,
        config: options.config,
        created: Arc::clone(&created),
    };

    let (mut container, mut view) = factory.attach(&options, 0);
    container.on_trigger_action();
    let presenter = container
        .presenter()
        .cloned()
        .context("container holds no presenter after attach")?;

    let mut recreate_at: Vec<u32> = options.recreate_at.clone();
    recreate_at.sort_unstable();
    recreate_at.dedup();
    let mut recreate_at = VecDeque::from(recreate_at);
    let mut recreations = 0;
    let mut left = false;

    loop {
        let snapshot = presenter.snapshot();

        if options.leave_at.is_some_and(|at| snapshot.progress >= at) {
            info!(progress = snapshot.progress, "Leaving screen");
            left = true;
            break;
        }

        while recreate_at.front().is_some_and(|&at| snapshot.progress >= at) {
            recreate_at.pop_front();
            recreations += 1;
            info!(progress = snapshot.progress, recreations, "Recreating screen");

            container.on_save_state();
            container.on_detached();
            view.close();
            container.on_destroyed();

            (container, view) = factory.attach(&options, recreations);
        }

        if !snapshot.running {
            break;
        }
        if !ui.run_next().await {
            debug!("UI loop closed");
            break;
        }
    }

    container.on_detached();
    view.close();
    container.on_destroyed();

    let snapshot = presenter.snapshot();
    let report = DemoReport {
        final_progress: snapshot.progress,
        completed: !left && snapshot.progress == snapshot.total,
        recreations,
        presenters_created: created.load(Ordering::SeqCst),
        retained_after_exit: store.contains(container.key()),
    };
    debug!(?report, "Demo finished");
    Ok(report)
}

/// Builds containers sharing one store, UI loop and ticker.
struct ScreenFactory {
    store: RetentionStore,
    ui: UiHandle,
    ticker: Arc<dyn TickerPort>,
    config: ProgressConfig,
    created: Arc<AtomicUsize>,
}

impl ScreenFactory {
    fn container(&self) -> Container<ProgressPresenter> {
        let ui = self.ui.clone();
        let ticker = Arc::clone(&self.ticker);
        let config = self.config;
        let created = Arc::clone(&self.created);
        Container::for_type::<MainScreen, _>(self.store.clone(), move || {
            created.fetch_add(1, Ordering::SeqCst);
            ProgressPresenter::new(config, Arc::clone(&ticker), ui.clone())
        })
    }

    fn attach(
        &self,
        options: &DemoOptions,
        incarnation: usize,
    ) -> (Container<ProgressPresenter>, Arc<TerminalView>) {
        let view = Arc::new(TerminalView::new(
            self.config.total_ticks,
            format!("screen #{incarnation}"),
            options.output,
        ));
        let mut container = self.container();
        container.on_attached(Arc::clone(&view) as Arc<dyn ProgressView>);
        (container, view)
    }
}
