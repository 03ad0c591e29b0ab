//! Core of holdover: keep a presenter alive across transient container
//! recreation, and tear it down exactly once when the container goes away
//! for good.
//!
//! # Architecture
//!
//! ```text
//! Host signals ──► Container ──► RetentionStore (key ─► presenter)
//!                      │
//!                      ▼
//!                  Presenter ──► ProgressView      (UI loop only)
//!                      │
//!                      ▼
//!                  TickerPort ──► worker ──► UiHandle::post ──► Presenter::deliver
//! ```
//!
//! # Rules
//!
//! 1. **No runtime dependency** - ticking lives behind [`ports::TickerPort`]
//! 2. **Single delivery context** - views are only touched from a [`UiLoop`]
//! 3. **Explicit store scope** - a [`RetentionStore`] is passed in, never global
//! 4. **Total lifecycle** - bind, unbind, destroy and removal never fail

#![deny(unsafe_code)]

pub mod config;
pub mod container;
pub mod error;
pub mod ports;
pub mod presenter;
pub mod retention;
pub mod task;
pub mod ui;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{DEFAULT_TICK_INTERVAL_MS, DEFAULT_TOTAL_TICKS, ProgressConfig};
pub use container::{Container, ContainerPhase};
pub use error::{ConfigError, TaskError};
pub use ports::{NoopView, Presenter, ProgressView, TickerPort};
pub use presenter::{ProgressPresenter, ProgressSnapshot, ViewUpdate};
pub use retention::{Payload, RetainedEntry, RetentionKey, RetentionStore};
pub use task::{TaskHandle, TaskId, TaskState, TickEvent, TickEventKind, TickSchedule, TickSink};
pub use ui::{UiHandle, UiLoop};
