//! Terminal rendering of the progress screen.
//!
//! One [`TerminalView`] per container incarnation. A recreated screen gets a
//! fresh bar, the way a host would inflate a new view hierarchy.

use std::sync::{Mutex, MutexGuard, PoisonError};

use holdover_core::ProgressView;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Where a [`TerminalView`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOutput {
    Stderr,
    Hidden,
}

impl BarOutput {
    fn target(self) -> ProgressDrawTarget {
        match self {
            Self::Stderr => ProgressDrawTarget::stderr(),
            Self::Hidden => ProgressDrawTarget::hidden(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ViewState {
    progress: u32,
    visible: bool,
    trigger_enabled: bool,
}

/// [`ProgressView`] drawing an `indicatif` bar.
pub struct TerminalView {
    bar: ProgressBar,
    output: BarOutput,
    state: Mutex<ViewState>,
}

impl TerminalView {
    /// Create a view for a run of `total` ticks. The bar starts hidden.
    pub fn new(total: u32, label: impl Into<String>, output: BarOutput) -> Self {
        let bar =
            ProgressBar::with_draw_target(Some(u64::from(total)), ProgressDrawTarget::hidden());
        bar.set_style(bar_style());
        bar.set_message(label.into());
        Self {
            bar,
            output,
            state: Mutex::new(ViewState {
                trigger_enabled: true,
                ..ViewState::default()
            }),
        }
    }

    pub fn progress(&self) -> u32 {
        self.lock().progress
    }

    pub fn is_progress_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn is_trigger_enabled(&self) -> bool {
        self.lock().trigger_enabled
    }

    /// The host tore this view down; leave the last frame on screen.
    pub fn close(&self) {
        if self.lock().visible {
            self.bar.abandon();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressView for TerminalView {
    fn set_progress(&self, value: u32) {
        self.lock().progress = value;
        self.bar.set_position(u64::from(value));
    }

    fn set_progress_visible(&self, visible: bool) {
        self.lock().visible = visible;
        if visible {
            self.bar.set_draw_target(self.output.target());
            self.bar.tick();
        } else {
            self.bar.finish();
        }
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.lock().trigger_enabled = enabled;
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:>10} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3}",
    )
    .map(|style| style.progress_chars("█▓░"))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
}
