//! Tokio runtime adapters for holdover.
//!
//! Provides [`IntervalTicker`], the production [`TickerPort`] implementation.
//! Workers run on the tokio runtime and hand every event to the sink they
//! were started with; they never touch presenter or view state themselves.
//!
//! [`TickerPort`]: holdover_core::TickerPort

#![deny(unsafe_code)]

pub mod ticker;

pub use ticker::IntervalTicker;
