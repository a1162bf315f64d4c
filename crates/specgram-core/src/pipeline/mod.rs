//! Overlapped-frame worker pool with ordered output
//!
//! This is the heart of the crate. The dispatcher turns the input stream
//! into overlapped frames through a ring buffer and hands each frame to the
//! next worker in round-robin order. Workers compute FFT magnitudes in
//! parallel and finish out of order, but the writer ticket admits them to
//! the output stream strictly in dispatch order, so the k-th frame taken
//! from the input is always the k-th block in the file.
//!
//! Backpressure is built in: a frame is only handed to a worker whose
//! scratch buffer has come back from its previous frame, so the dispatcher
//! blocks rather than dropping data when every worker is busy.

mod dispatcher;
mod error;
mod pool;
mod ring;
mod ticket;
mod worker;

pub use dispatcher::{run, RunStats};
pub use error::PipelineError;

use crate::types::IqSample;

/// One frame's worth of samples, owned by whoever holds it
///
/// The buffer travels: dispatcher (fills it) -> worker inbox -> worker
/// (consumes it) -> return channel -> dispatcher. Ownership moving through
/// the channels is the hand-off barrier: the dispatcher can only write into
/// a frame it has gotten back, so a busy worker's input is never touched.
pub type FrameBuf = Vec<IqSample>;
