//! Error types for the holdover core.
//!
//! Lifecycle operations (bind, unbind, destroy, store removal) are total and
//! have no error type. The only fallible surfaces are configuration and the
//! tick worker infrastructure.

use thiserror::Error;

/// Invalid [`ProgressConfig`](crate::ProgressConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("total tick count must be at least 1")]
    ZeroTicks,

    #[error("tick interval must be at least 1 ms")]
    ZeroInterval,
}

/// Failure of the infrastructure driving a periodic task.
///
/// Delivered to the presenter as a [`TickEventKind::Failed`](crate::TickEventKind)
/// event and absorbed there: it ends the run but never reaches the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The worker producing ticks panicked.
    #[error("tick worker panicked: {0}")]
    WorkerPanicked(String),

    /// The worker was torn down by its runtime before finishing.
    #[error("tick worker aborted")]
    Aborted,

    /// The worker was handed a schedule it cannot run.
    #[error("invalid tick schedule: {0}")]
    InvalidSchedule(#[from] ConfigError),
}
