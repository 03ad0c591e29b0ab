//! Port definitions (trait abstractions) for the presenter's collaborators.
//!
//! Ports define the interfaces the core expects from the outside: a view to
//! push state to, a presenter the container drives, and a ticker that runs
//! periodic work off the delivery context.
//!
//! # Design Rules
//!
//! - No runtime types in any signature (no `JoinHandle`, no channels)
//! - The view port is exactly the three pushes a progress screen needs
//! - Every port is `Send + Sync` so it can be shared behind `Arc<dyn ...>`

pub mod presenter;
pub mod ticker;
pub mod view;

pub use presenter::Presenter;
pub use ticker::TickerPort;
pub use view::{NoopView, ProgressView};

#[cfg(test)]
pub use presenter::MockPresenter;
#[cfg(test)]
pub use view::MockProgressView;
