//! Container: turns host lifecycle signals into presenter calls.
//!
//! A container is one incarnation of a screen. The host creates a new
//! container on every recreation; the presenter survives in the
//! [`RetentionStore`] under the container's [`RetentionKey`].
//!
//! ```text
//! on_attached ──► find_or_create ──► bind_view
//! on_save_state ──► this teardown is transient
//! on_detached ──► unbind_view
//! on_destroyed ──► final?  destroy ──► store.remove
//!                  else    keep entry for the next container
//! ```
//!
//! Destruction is treated as final unless the host reported
//! [`on_save_state`](Container::on_save_state) since the last attach.

use std::sync::Arc;

use tracing::debug;

use crate::ports::{Presenter, ProgressView};
use crate::retention::{RetainedEntry, RetentionKey, RetentionStore};

type PresenterFactory<P> = Box<dyn Fn() -> Arc<P> + Send + Sync>;

/// Where a container is in its host lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    Created,
    Attached,
    Detached,
    Destroyed,
}

/// Lifecycle owner for one presenter of type `P`.
pub struct Container<P: Presenter> {
    key: RetentionKey,
    store: RetentionStore,
    factory: PresenterFactory<P>,
    entry: Option<Arc<RetainedEntry>>,
    presenter: Option<Arc<P>>,
    pending_final_destroy: bool,
    view_bound: bool,
    phase: ContainerPhase,
}

impl<P: Presenter> Container<P> {
    /// Create a container that retains its presenter under `key`.
    ///
    /// `factory` is only called when the store has no presenter for `key`.
    pub fn new<F>(store: RetentionStore, key: RetentionKey, factory: F) -> Self
    where
        F: Fn() -> Arc<P> + Send + Sync + 'static,
    {
        Self {
            key,
            store,
            factory: Box::new(factory),
            entry: None,
            presenter: None,
            pending_final_destroy: true,
            view_bound: false,
            phase: ContainerPhase::Created,
        }
    }

    /// Create a container keyed by the concrete screen type `C`.
    pub fn for_type<C, F>(store: RetentionStore, factory: F) -> Self
    where
        C: ?Sized + 'static,
        F: Fn() -> Arc<P> + Send + Sync + 'static,
    {
        Self::new(store, RetentionKey::of::<C>(), factory)
    }

    pub const fn key(&self) -> &RetentionKey {
        &self.key
    }

    pub const fn phase(&self) -> ContainerPhase {
        self.phase
    }

    /// The presenter, while this container holds one.
    pub const fn presenter(&self) -> Option<&Arc<P>> {
        self.presenter.as_ref()
    }

    /// Whether a destroy signal arriving now would release the presenter.
    pub const fn is_pending_final_destroy(&self) -> bool {
        self.pending_final_destroy
    }

    /// The host attached a view. Looks up or creates the presenter and binds.
    pub fn on_attached(&mut self, view: Arc<dyn ProgressView>) {
        if self.view_bound {
            self.unbind();
        }

        let entry = self.store.find_or_create(&self.key);
        let presenter = if let Some(existing) = entry.get::<P>() {
            debug!(key = %self.key, "Reusing retained presenter");
            existing
        } else {
            debug!(key = %self.key, "Creating presenter");
            let created = (self.factory)();
            entry.set(Arc::clone(&created));
            created
        };

        self.entry = Some(entry);
        self.presenter = Some(Arc::clone(&presenter));
        self.pending_final_destroy = true;
        self.phase = ContainerPhase::Attached;

        presenter.bind_view(view);
        self.view_bound = true;
    }

    /// The host is saving state: the coming teardown is transient.
    ///
    /// Must arrive before [`on_destroyed`](Self::on_destroyed) to take effect.
    pub fn on_save_state(&mut self) {
        debug!(key = %self.key, "Host saving state; teardown will be transient");
        self.pending_final_destroy = false;
    }

    /// The host tore the view down.
    pub fn on_detached(&mut self) {
        if !self.view_bound {
            debug!(key = %self.key, phase = ?self.phase, "Detach without bound view");
            return;
        }
        self.unbind();
        self.phase = ContainerPhase::Detached;
    }

    /// The host destroyed the container.
    ///
    /// Always unbinds first. On a final teardown the presenter is destroyed
    /// and only then removed from the store.
    pub fn on_destroyed(&mut self) {
        if self.phase == ContainerPhase::Destroyed {
            debug!(key = %self.key, "Container already destroyed");
            return;
        }
        if self.view_bound {
            self.unbind();
        }

        let presenter = self.presenter.take();
        let entry = self.entry.take();
        self.phase = ContainerPhase::Destroyed;

        let Some(entry) = entry else {
            debug!(key = %self.key, "Container destroyed before attach");
            return;
        };

        if self.pending_final_destroy {
            if let Some(presenter) = presenter {
                presenter.destroy();
            }
            self.store.remove(&self.key);
            entry.clear();
            debug!(key = %self.key, "Container finished; presenter released");
        } else {
            debug!(key = %self.key, "Container destroyed by host; presenter retained");
        }
    }

    /// Forward the view's trigger control to the presenter.
    pub fn on_trigger_action(&self) {
        match &self.presenter {
            Some(presenter) if self.view_bound => presenter.on_trigger_action(),
            _ => debug!(key = %self.key, phase = ?self.phase, "Trigger without bound view"),
        }
    }

    fn unbind(&mut self) {
        if let Some(presenter) = &self.presenter {
            presenter.unbind_view();
        }
        self.view_bound = false;
    }
}

impl<P: Presenter> std::fmt::Debug for Container<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("pending_final_destroy", &self.pending_final_destroy)
            .field("view_bound", &self.view_bound)
            .finish_non_exhaustive()
    }
}
