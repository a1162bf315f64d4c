//! Specgram Core - overlapped STFT pipeline for radio I/Q sample streams
//!
//! The library turns a continuous stream of complex samples (a recorded
//! capture or an SDR receiver) into a stream of magnitude spectra: fixed-size
//! frames are lifted from a ring buffer at a configurable hop, windowed,
//! transformed by a bank of worker threads, and written to the output in the
//! exact order they were taken from the input.
//!
//! # Architecture
//!
//! ```text
//! ┌────────┐  hop reads  ┌────────────┐  Start(frame)   ┌───────────┐
//! │ source │ ──────────► │ dispatcher │ ──────────────► │ worker 0  │──┐
//! └────────┘             │ (ring buf) │ ──────────────► │ worker 1  │──┤ ticket +
//!                        └────────────┘       ...       │   ...     │──┤ output
//!                                                       │ worker W-1│──┘ mutex
//!                                                       └───────────┘
//! ```
//!
//! Workers finish out of order; the writer ticket serializes their file
//! writes back into dispatch order.

pub mod config;
pub mod energy;
pub mod fft;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod window;

pub use types::*;
