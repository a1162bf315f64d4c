//! Circular frame buffer
//!
//! Holds the most recent `fft_size` samples of the input stream. The
//! dispatcher fills one hop-sized segment per read; once the ring has filled
//! for the first time, every committed hop yields a complete frame. The head
//! always points at the oldest sample, so reconstructing a time-ordered
//! frame is a two-segment copy.

use crate::types::IqSample;

pub struct FrameRing {
    buf: Vec<IqSample>,
    hop: usize,
    head: usize,
    filled: bool,
}

impl FrameRing {
    pub fn new(fft_size: usize, hop: usize) -> Self {
        debug_assert!(hop > 0 && fft_size % hop == 0);
        Self {
            buf: vec![IqSample::default(); fft_size],
            hop,
            head: 0,
            filled: false,
        }
    }

    /// The hop-sized segment the next read lands in
    pub fn fill_slot(&mut self) -> &mut [IqSample] {
        let start = self.head;
        &mut self.buf[start..start + self.hop]
    }

    /// Commit a completed hop; returns true when a full frame is ready
    ///
    /// The head advances past the freshly written segment (wrapping), which
    /// leaves it on the oldest sample in the ring. The first frame is ready
    /// the moment the ring fills, with no extra priming hop.
    pub fn commit_hop(&mut self) -> bool {
        if !self.filled && self.head == self.buf.len() - self.hop {
            self.filled = true;
        }
        self.head += self.hop;
        if self.head == self.buf.len() {
            self.head = 0;
        }
        self.filled
    }

    /// Copy the ring into `dst` oldest-first
    pub fn copy_ordered_into(&self, dst: &mut [IqSample]) {
        debug_assert_eq!(dst.len(), self.buf.len());
        let split = self.buf.len() - self.head;
        dst[..split].copy_from_slice(&self.buf[self.head..]);
        dst[split..].copy_from_slice(&self.buf[..self.head]);
    }
}
