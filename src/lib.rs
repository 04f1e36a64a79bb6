//! # microbatch
//!
//! A generic event micro-batcher: accepts a continuous stream of
//! individually submitted items and groups them into batches according to
//! a pluggable policy (size reached, time elapsed, or both), delivering
//! completed batches to a consumer.
//!
//! ## Overview
//!
//! The crate sits between high-frequency producers (keystrokes, log lines,
//! telemetry points) and a downstream sink that is more efficient when
//! driven with groups than with singletons (an LLM call, a bulk database
//! write). A single background task owns the in-flight batch and
//! multiplexes three signals: new events, a periodic flush timer, and
//! shutdown. No item is ever duplicated across flushes; every item ends up
//! in exactly one emitted batch or stays pending until stop discards it.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Microbatcher`] | The engine: `add` / `start` / `stop` plus a result stream |
//! | [`BatcherConfig`] | Strategy, processor, and timer configuration |
//! | [`FlushStrategy`] | Policy deciding when and how much of the batch to emit |
//! | [`SizeBasedStrategy`] | Flush once the buffer reaches a fixed size |
//! | [`TimeBasedStrategy`] | Flush events that arrived since the previous flush |
//! | [`BatchProcessor`] | Transform applied to each flushed batch |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use microbatch::{BatcherConfig, Microbatcher, SizeBasedStrategy};
//!
//! #[tokio::main]
//! async fn main() -> microbatch::Result<()> {
//!     let config = BatcherConfig::new().with_strategy(SizeBasedStrategy::new(3)?);
//!     let (batcher, mut results) = Microbatcher::new(config)?;
//!     batcher.start();
//!
//!     batcher.add(["fix typo", "run tests", "ship it"]).await?;
//!
//!     if let Some(batch) = results.recv().await {
//!         for result in batch {
//!             println!("{}", result.event.payload);
//!         }
//!     }
//!
//!     batcher.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Back-pressure
//!
//! The event and result channels each hold at most one entry. A flush
//! blocks the loop until the consumer reads the previous result, and a
//! busy loop blocks producers inside [`Microbatcher::add`]. Slow
//! consumption therefore stalls production instead of growing an unbounded
//! queue; there is no explicit queue-depth limit.

pub mod config;
pub mod engine;
pub mod event;
pub mod processor;
pub mod strategy;

mod error;

pub use config::{BatcherConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_BATCH_SIZE};
pub use engine::Microbatcher;
pub use error::{Error, Result};
pub use event::{Batch, Event, ProcessError, ResultBatch, ResultEvent};
pub use processor::{BatchProcessor, IdentityProcessor};
pub use strategy::{FlushStrategy, SizeBasedStrategy, TimeBasedStrategy};
