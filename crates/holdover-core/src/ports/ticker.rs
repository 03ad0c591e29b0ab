//! Ticker port: starts periodic work off the delivery context.

use crate::task::{TaskHandle, TickSchedule, TickSink};

/// Starts single-shot periodic tasks.
///
/// An implementation emits `TickEvent::tick(id, 0..total_ticks)` to the sink,
/// one per `schedule.interval`, followed by `TickEvent::completed(id)`. After
/// the returned handle is cancelled it must stop emitting; the owner also
/// drops anything that was already in flight.
pub trait TickerPort: Send + Sync {
    fn start(&self, schedule: TickSchedule, sink: TickSink) -> TaskHandle;
}
