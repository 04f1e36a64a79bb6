//! Flush strategies.
//!
//! A strategy is the pluggable policy that decides *when* the current batch
//! should flush and *which* of its events are emitted. The engine only ever
//! talks to the two-method [`FlushStrategy`] trait, so composite or custom
//! policies plug in the same way the built-in ones do.

mod size;
mod time;

pub use size::SizeBasedStrategy;
pub use time::TimeBasedStrategy;

use crate::event::Batch;

/// Policy answering "should we flush now" and "which events flush".
pub trait FlushStrategy<T>: Send {
    /// Pure predicate with no side effects; calling it repeatedly on an
    /// unchanged batch returns the same answer.
    fn should_flush(&self, batch: &Batch<T>) -> bool;

    /// Removes the events to emit now from the live buffer and returns
    /// them, each marked flushed. Whatever is left in `batch` is the
    /// remainder and stays pending for the next cycle, so the remainder is
    /// always exactly "buffer minus flushed subset" in arrival order.
    /// Empty input yields an empty output.
    fn flush_batch(&mut self, batch: &mut Batch<T>) -> Batch<T>;
}
