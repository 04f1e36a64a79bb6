//! The accumulation-and-flush engine.
//!
//! One background task owns the live buffer and multiplexes three signals:
//! new events, the periodic flush timer, and shutdown. Producers hand
//! events over through a rendezvous-sized channel, so a busy loop (or an
//! unread result batch) stalls them instead of growing an unbounded queue.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::BatcherConfig;
use crate::event::{Batch, Event, ResultBatch};
use crate::processor::BatchProcessor;
use crate::strategy::FlushStrategy;
use crate::{Error, Result};

/// Concurrent micro-batching engine.
///
/// Lifecycle: [`Microbatcher::new`] validates the configuration and hands
/// back the engine plus the result stream, [`start`](Self::start) spawns
/// the consuming loop, any number of tasks call [`add`](Self::add), and
/// [`stop`](Self::stop) shuts the loop down and waits for it to exit.
/// Events still buffered at stop are dropped; events already flushed are
/// never lost or duplicated.
///
/// Dropping the engine without calling `stop` also terminates the loop,
/// because the event channel closes when its last sender goes away.
pub struct Microbatcher<T> {
    open: Arc<Mutex<bool>>,
    event_tx: mpsc::Sender<Event<T>>,
    cancel: CancellationToken,
    loop_state: StdMutex<Option<LoopState<T>>>,
    handle: StdMutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Microbatcher<T> {
    /// Builds the engine and its result stream.
    ///
    /// The returned receiver yields one [`ResultBatch`] per flush and
    /// closes once the loop exits, so consumers can detect termination.
    /// Both internal channels hold at most one entry (tokio has no
    /// zero-capacity channel): an unread result batch blocks the loop on
    /// its next flush, and through the event channel that back-pressure
    /// reaches producers.
    pub fn new(config: BatcherConfig<T>) -> Result<(Self, mpsc::Receiver<ResultBatch<T>>)> {
        if config.flush_interval.is_zero() {
            return Err(Error::configuration("flush_interval must be non-zero"));
        }

        let (event_tx, event_rx) = mpsc::channel(1);
        let (result_tx, result_rx) = mpsc::channel(1);
        let open = Arc::new(Mutex::new(true));
        let cancel = CancellationToken::new();

        let state = LoopState {
            event_rx,
            result_tx,
            strategy: config.strategy,
            processor: config.processor,
            flush_interval: config.flush_interval,
            open: Arc::clone(&open),
            cancel: cancel.clone(),
        };

        let batcher = Self {
            open,
            event_tx,
            cancel,
            loop_state: StdMutex::new(Some(state)),
            handle: StdMutex::new(None),
        };
        Ok((batcher, result_rx))
    }

    /// Spawns the single consuming loop onto the current tokio runtime.
    ///
    /// Exactly one loop ever runs; a second call does nothing but warn.
    pub fn start(&self) {
        let state = self.loop_state.lock().unwrap().take();
        match state {
            Some(state) => {
                let handle = tokio::spawn(state.run());
                *self.handle.lock().unwrap() = Some(handle);
            }
            None => warn!("microbatcher already started"),
        }
    }

    /// Hands items to the consuming loop, stamping each one's arrival
    /// timestamp at the moment it enters the event channel.
    ///
    /// Blocks while the loop is busy (back-pressure). Fails with
    /// [`Error::Closed`] once the engine is stopping; items handed off
    /// before the state flipped stay enqueued, so a multi-item call is
    /// best-effort rather than all-or-nothing. Callers needing a deadline
    /// can wrap the future in `tokio::time::timeout`.
    pub async fn add<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let open = self.open.lock().await;
        if !*open {
            return Err(Error::Closed);
        }
        for item in items {
            if self.event_tx.send(Event::new(item)).await.is_err() {
                // The loop closed its receiver between our open-check and
                // this send; same outcome as observing the flag.
                return Err(Error::Closed);
            }
        }
        Ok(())
    }

    /// Signals shutdown and waits for the consuming loop to exit.
    ///
    /// After this returns no loop task remains, the result stream is
    /// closed, and any events that were still pending have been dropped.
    /// Idempotent: only the first caller joins the loop, later calls
    /// return immediately.
    ///
    /// The shutdown drain publishes any final flush through the result
    /// channel, so a consumer that holds the receiver must keep draining
    /// results until the stream closes or this call blocks with it.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!(error = %err, "microbatcher loop task failed");
            }
        }
    }
}

impl<T> fmt::Debug for Microbatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Microbatcher").finish_non_exhaustive()
    }
}

struct LoopState<T> {
    event_rx: mpsc::Receiver<Event<T>>,
    result_tx: mpsc::Sender<ResultBatch<T>>,
    strategy: Box<dyn FlushStrategy<T>>,
    processor: Box<dyn BatchProcessor<T>>,
    flush_interval: Duration,
    open: Arc<Mutex<bool>>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> LoopState<T> {
    async fn run(mut self) {
        let mut buffer: Batch<T> = Vec::new();
        let mut ticker = time::interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; push the first tick out a full period
        ticker.reset();

        loop {
            tokio::select! {
                maybe_event = self.event_rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            buffer.push(event);
                            if self.strategy.should_flush(&buffer) {
                                self.flush(&mut buffer).await;
                                ticker.reset();
                            }
                        }
                        // All senders gone: the engine was dropped.
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    if buffer.is_empty() {
                        continue;
                    }
                    self.flush(&mut buffer).await;
                    ticker.reset();
                }
                _ = self.cancel.cancelled() => {
                    self.shutdown(&mut buffer).await;
                    break;
                }
            }
        }
        debug!("microbatcher loop exited");
    }

    /// Asks the strategy which events to emit, processes them, and
    /// publishes the result. The strategy leaves the remainder in
    /// `buffer`, so bookkeeping is the same for size- and time-triggered
    /// flushes.
    async fn flush(&mut self, buffer: &mut Batch<T>) {
        let flushed = self.strategy.flush_batch(buffer);
        if flushed.is_empty() {
            return;
        }
        debug!(flushed = flushed.len(), pending = buffer.len(), "flushing batch");

        let processed = catch_unwind(AssertUnwindSafe(|| self.processor.process(flushed)));
        let processed = match processed {
            Ok(processed) => processed,
            Err(_) => {
                // Caller-supplied code defect; contain it so the loop
                // survives. The batch moved into the processor and is gone.
                error!("batch processor panicked, dropping the flushed batch");
                return;
            }
        };

        if self.result_tx.send(processed).await.is_err() {
            warn!("result receiver dropped, discarding processed batch");
        }
    }

    /// Closing: reject new producers, drain what was already handed off,
    /// then drop whatever is still pending.
    async fn shutdown(&mut self, buffer: &mut Batch<T>) {
        self.event_rx.close();
        *self.open.lock().await = false;

        while let Some(event) = self.event_rx.recv().await {
            buffer.push(event);
            if self.strategy.should_flush(buffer) {
                self.flush(buffer).await;
            }
        }

        if !buffer.is_empty() {
            debug!(dropped = buffer.len(), "discarding pending events on stop");
        }
    }
}
