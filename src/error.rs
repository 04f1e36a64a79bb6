use thiserror::Error;

/// Unified error type for the microbatcher.
///
/// Construction-time problems surface as [`Error::Configuration`] and never
/// occur mid-run; the only error a producer sees synchronously is
/// [`Error::Closed`]. Per-item processing failures travel inside the result
/// stream as [`crate::ProcessError`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// `add` was called after the engine started shutting down.
    #[error("cannot add: microbatcher is closed")]
    Closed,

    /// Invalid strategy or engine parameters, rejected at construction.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
