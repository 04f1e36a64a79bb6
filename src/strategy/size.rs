use super::FlushStrategy;
use crate::config::DEFAULT_MAX_BATCH_SIZE;
use crate::event::Batch;
use crate::{Error, Result};

/// Flushes once the buffer holds at least `max_size` events.
///
/// A buffer that somehow grew past the threshold (e.g. a timer flush was
/// skipped while the buffer was already full) emits only the overflow tail
/// beyond `max_size`; the head stays pending for the next cycle.
#[derive(Debug, Clone)]
pub struct SizeBasedStrategy {
    max_size: usize,
}

impl SizeBasedStrategy {
    /// A zero threshold is rejected: it would force a flush on every
    /// single add and never batch anything.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::configuration(
                "size-based strategy requires max_size >= 1",
            ));
        }
        Ok(Self { max_size })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for SizeBasedStrategy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl<T> FlushStrategy<T> for SizeBasedStrategy {
    fn should_flush(&self, batch: &Batch<T>) -> bool {
        batch.len() >= self.max_size
    }

    fn flush_batch(&mut self, batch: &mut Batch<T>) -> Batch<T> {
        let mut flushed = if batch.len() <= self.max_size {
            std::mem::take(batch)
        } else {
            batch.split_off(self.max_size)
        };
        for event in &mut flushed {
            event.mark_flushed();
        }
        flushed
    }
}
