use tokio::time::{Duration, Instant};

use super::FlushStrategy;
use crate::event::Batch;
use crate::{Error, Result};

/// Flushes on a time cadence.
///
/// Tracks when it last flushed; the first-ever flush emits the whole
/// buffer, afterwards only the events that arrived since the previous
/// flush are selected. An empty buffer never flushes.
#[derive(Debug, Clone)]
pub struct TimeBasedStrategy {
    interval: Duration,
    flushed_at: Option<Instant>,
}

impl TimeBasedStrategy {
    /// A zero interval is rejected: it would degrade to flushing on every
    /// timer tick regardless of arrivals.
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::configuration(
                "time-based strategy requires a non-zero interval",
            ));
        }
        Ok(Self {
            interval,
            flushed_at: None,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<T> FlushStrategy<T> for TimeBasedStrategy {
    fn should_flush(&self, batch: &Batch<T>) -> bool {
        if batch.is_empty() {
            return false;
        }
        match self.flushed_at {
            None => true,
            Some(at) => {
                at.elapsed() >= self.interval && batch.iter().any(|e| e.added_at() > at)
            }
        }
    }

    fn flush_batch(&mut self, batch: &mut Batch<T>) -> Batch<T> {
        let mut flushed = match self.flushed_at {
            None => std::mem::take(batch),
            Some(at) => {
                // added_at is non-decreasing in arrival order, so everything
                // from the first event newer than the baseline flushes.
                let split = batch
                    .iter()
                    .position(|e| e.added_at() > at)
                    .unwrap_or(batch.len());
                batch.split_off(split)
            }
        };
        if !flushed.is_empty() || self.flushed_at.is_none() {
            self.flushed_at = Some(Instant::now());
        }
        for event in &mut flushed {
            event.mark_flushed();
        }
        flushed
    }
}
