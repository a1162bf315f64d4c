//! SDR receiver adapter
//!
//! The actual device driver is an external collaborator; it shows up here
//! only through the [`IqReceiver`] trait, which mirrors the streaming
//! `recv(buffer, count) -> (samples, error_code)` surface SDR drivers expose.
//! [`SdrSource`] turns that into a [`SampleSource`]: it enforces the total
//! sample cap, forwards overflow as a non-fatal flag, and treats timeout or
//! any unclassified device error as the end of the run.

use crate::config::SdrConfig;
use crate::types::IqSample;

use super::{Recv, SampleSource, SourceError};

/// Status code attached to one device read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvCode {
    /// Read completed normally
    None,
    /// The device dropped samples; the read may still carry data
    Overflow,
    /// The device produced nothing within its timeout
    Timeout,
    /// Anything else the driver reports
    Other,
}

/// One streaming read from the receiver hardware
pub trait IqReceiver: Send {
    fn recv(&mut self, buf: &mut [IqSample]) -> (usize, RecvCode);
}

/// [`SampleSource`] over a live receiver, bounded by the configured cap
pub struct SdrSource<R> {
    receiver: R,
    remaining: u64,
}

impl<R: IqReceiver> SdrSource<R> {
    pub fn new(receiver: R, config: &SdrConfig) -> Self {
        Self {
            receiver,
            remaining: config.max_samples(),
        }
    }

    /// Samples still allowed before the cap ends the run
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<R: IqReceiver> SampleSource for SdrSource<R> {
    fn recv(&mut self, buf: &mut [IqSample]) -> Result<Recv, SourceError> {
        let want = (buf.len() as u64).min(self.remaining) as usize;
        let mut filled = 0;
        let mut overflow = false;

        while filled < want {
            let (got, code) = self.receiver.recv(&mut buf[filled..want]);
            match code {
                RecvCode::None => {}
                RecvCode::Overflow => overflow = true,
                RecvCode::Timeout => return Err(SourceError::Timeout),
                RecvCode::Other => {
                    return Err(SourceError::Device("unclassified receiver error".into()))
                }
            }
            if got == 0 && code == RecvCode::None {
                break;
            }
            filled += got;
        }

        self.remaining -= filled as u64;
        Ok(Recv {
            samples: filled,
            overflow,
        })
    }
}
