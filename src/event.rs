//! Event envelope and batch types.

use thiserror::Error;
use tokio::time::Instant;

/// A single item in flight through the batcher.
///
/// The engine stamps `added_at` at the moment the payload is handed to the
/// consuming loop, so timestamps within the live buffer are monotonically
/// non-decreasing in arrival order. The flushed marker lets a strategy
/// partition a batch without losing per-event metadata; callers cannot
/// pre-set it because events are only ever constructed by the engine.
#[derive(Debug, Clone)]
pub struct Event<T> {
    pub payload: T,
    added_at: Instant,
    flushed: bool,
}

impl<T> Event<T> {
    pub(crate) fn new(payload: T) -> Self {
        Self {
            payload,
            added_at: Instant::now(),
            flushed: false,
        }
    }

    /// When the engine accepted this event.
    pub fn added_at(&self) -> Instant {
        self.added_at
    }

    /// Marks this event as selected for the flush in progress.
    pub fn mark_flushed(&mut self) {
        self.flushed = true;
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Consumes the event, returning its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Ordered sequence of events; insertion order is arrival order.
///
/// An empty batch is a valid state, distinct from "flushed".
pub type Batch<T> = Vec<Event<T>>;

/// Failure of a single item inside a processed batch.
///
/// Never propagates out of the engine loop; one bad item never aborts a
/// batch or the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProcessError {
    pub message: String,
    pub retryable: bool,
}

impl ProcessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

/// Outcome of processing one event.
#[derive(Debug, Clone)]
pub struct ResultEvent<T> {
    pub event: Event<T>,
    pub error: Option<ProcessError>,
}

impl<T> ResultEvent<T> {
    pub fn ok(event: Event<T>) -> Self {
        Self { event, error: None }
    }

    pub fn failed(event: Event<T>, error: ProcessError) -> Self {
        Self {
            event,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Processed counterpart of a flushed batch, in the same order.
pub type ResultBatch<T> = Vec<ResultEvent<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_starts_unflushed() {
        let event = Event::new("payload");
        assert!(!event.is_flushed());
        assert_eq!(event.payload, "payload");
    }

    #[test]
    fn mark_flushed_is_sticky() {
        let mut event = Event::new(1);
        event.mark_flushed();
        event.mark_flushed();
        assert!(event.is_flushed());
    }

    #[tokio::test(start_paused = true)]
    async fn added_at_reflects_construction_time() {
        let first = Event::new(1);
        tokio::time::advance(std::time::Duration::from_millis(10)).await;
        let second = Event::new(2);
        assert!(second.added_at() > first.added_at());
    }

    #[test]
    fn process_error_display_and_retry_flag() {
        let err = ProcessError::new("rate limited").retryable();
        assert_eq!(err.to_string(), "rate limited");
        assert!(err.retryable);
        assert!(!ProcessError::new("bad input").retryable);
    }

    #[test]
    fn result_event_success_and_failure() {
        let ok = ResultEvent::ok(Event::new(1));
        assert!(ok.is_ok());

        let failed = ResultEvent::failed(Event::new(2), ProcessError::new("boom"));
        assert!(!failed.is_ok());
        assert_eq!(failed.event.into_payload(), 2);
    }
}
