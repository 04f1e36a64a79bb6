//! Batch processor seam.

use crate::event::{Batch, ResultBatch, ResultEvent};

/// Transforms a flushed batch into one result per event.
///
/// Implementations must be order-preserving and must never drop items: the
/// engine publishes exactly what `process` returns, so a missing result is
/// a lost event. Failures belong inside individual [`ResultEvent`]s rather
/// than aborting the batch. The engine treats the call as potentially slow
/// and runs it with exclusive ownership of the flushed events; the live
/// buffer is never visible to the processor.
pub trait BatchProcessor<T>: Send {
    fn process(&self, batch: Batch<T>) -> ResultBatch<T>;
}

/// Default processor: wraps every event as a success, untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityProcessor;

impl<T> BatchProcessor<T> for IdentityProcessor {
    fn process(&self, batch: Batch<T>) -> ResultBatch<T> {
        batch.into_iter().map(ResultEvent::ok).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[test]
    fn identity_wraps_every_event_as_success() {
        let batch: Batch<i32> = vec![Event::new(1), Event::new(2), Event::new(3)];
        let results = IdentityProcessor.process(batch);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(ResultEvent::is_ok));
        let payloads: Vec<i32> = results
            .into_iter()
            .map(|r| r.event.into_payload())
            .collect();
        assert_eq!(payloads, vec![1, 2, 3]);
    }

    #[test]
    fn identity_preserves_an_empty_batch() {
        let results = IdentityProcessor.process(Batch::<String>::new());
        assert!(results.is_empty());
    }
}
