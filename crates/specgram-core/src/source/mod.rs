//! I/Q sample sources
//!
//! The dispatcher only sees the [`SampleSource`] trait; the concrete sources
//! are a raw capture file and an adapter over a streaming SDR receiver.

mod file;
mod sdr;

pub use file::FileSource;
pub use sdr::{IqReceiver, RecvCode, SdrSource};

use thiserror::Error;

use crate::types::IqSample;

/// Fatal source failures
///
/// Receiver overflow is deliberately not here: it is a warning carried on
/// [`Recv`] and the run continues.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The receiver stopped producing samples
    #[error("receiver timed out")]
    Timeout,

    /// Unclassified device error
    #[error("receiver error: {0}")]
    Device(String),

    #[error("input read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one `recv` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recv {
    /// Samples actually delivered; fewer than requested means the stream
    /// ended (end of file, or the live sample cap was reached)
    pub samples: usize,
    /// The device dropped samples since the last call; non-fatal
    pub overflow: bool,
}

/// A stream of complex baseband samples
pub trait SampleSource: Send {
    /// Fill as much of `buf` as the stream allows
    fn recv(&mut self, buf: &mut [IqSample]) -> Result<Recv, SourceError>;
}
