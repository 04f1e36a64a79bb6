//! Engine configuration.

use std::fmt;
use std::time::Duration;

use crate::processor::{BatchProcessor, IdentityProcessor};
use crate::strategy::{FlushStrategy, SizeBasedStrategy};

/// Threshold of the default size-based strategy.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5;

/// Cadence of the periodic flush timer when none is configured.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for [`crate::Microbatcher`].
///
/// Everything is optional: the defaults batch by size
/// ([`DEFAULT_MAX_BATCH_SIZE`]) with an identity processor and a
/// [`DEFAULT_FLUSH_INTERVAL`] timer fallback. Parameters are validated
/// when the engine is constructed, never mid-run.
pub struct BatcherConfig<T> {
    pub(crate) strategy: Box<dyn FlushStrategy<T>>,
    pub(crate) processor: Box<dyn BatchProcessor<T>>,
    pub(crate) flush_interval: Duration,
}

impl<T> BatcherConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the flush policy.
    pub fn with_strategy(mut self, strategy: impl FlushStrategy<T> + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Replaces the batch processor applied to every flushed batch.
    pub fn with_processor(mut self, processor: impl BatchProcessor<T> + 'static) -> Self {
        self.processor = Box::new(processor);
        self
    }

    /// Cadence of the periodic timer that flushes a quiet buffer.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }
}

impl<T> Default for BatcherConfig<T> {
    fn default() -> Self {
        Self {
            strategy: Box::new(SizeBasedStrategy::default()),
            processor: Box::new(IdentityProcessor),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl<T> fmt::Debug for BatcherConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatcherConfig")
            .field("flush_interval", &self.flush_interval)
            .finish_non_exhaustive()
    }
}
