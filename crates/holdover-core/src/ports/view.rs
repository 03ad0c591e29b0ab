//! View port: the observer a presenter pushes progress state to.
//!
//! Implementations are thin. They render what they are told and hold no
//! logic of their own (terminal bars, GUI widgets, test recorders).

/// Progress screen capabilities consumed by a presenter.
///
/// All calls happen on the delivery context. Implementations should not
/// block.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressView: Send + Sync {
    /// Show the current progress value.
    fn set_progress(&self, value: u32);

    /// Show or hide the progress indicator.
    fn set_progress_visible(&self, visible: bool);

    /// Enable or disable the control that starts a run.
    fn set_trigger_enabled(&self, enabled: bool);
}

/// A view that discards every update.
///
/// Useful for headless containers and for tests that only care about
/// presenter bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopView;

impl NoopView {
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressView for NoopView {
    fn set_progress(&self, _value: u32) {}

    fn set_progress_visible(&self, _visible: bool) {}

    fn set_trigger_enabled(&self, _enabled: bool) {}
}
