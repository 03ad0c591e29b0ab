//! Presenter port: the lifecycle calls a container makes.

use std::sync::Arc;

use super::view::ProgressView;

/// Business-logic owner driven by a [`Container`](crate::Container).
///
/// Every method is total. Unbinding an unbound presenter, or destroying a
/// destroyed one, is a no-op.
#[cfg_attr(test, mockall::automock)]
pub trait Presenter: Send + Sync + 'static {
    /// Attach a view. If work is in flight the view is brought up to date
    /// immediately.
    fn bind_view(&self, view: Arc<dyn ProgressView>);

    /// Detach the current view. Background work keeps running.
    fn unbind_view(&self);

    /// Permanent teardown. Cancels background work.
    fn destroy(&self);

    /// The view's trigger control was activated.
    fn on_trigger_action(&self);
}
