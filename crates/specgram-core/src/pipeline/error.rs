//! Pipeline error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::source::SourceError;

/// Errors that end an STFT run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration, caught before any worker spawns
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input source failed fatally
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the output stream failed
    #[error("output write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Could not spawn a worker thread
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A worker disappeared mid-run (panicked or hung up its channels)
    #[error("worker {0} exited unexpectedly")]
    WorkerLost(usize),
}
