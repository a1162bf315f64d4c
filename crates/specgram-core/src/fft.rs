//! Per-worker FFT engine
//!
//! Each worker owns one [`FftEngine`]: a pre-built forward plan plus the
//! output and scratch buffers the transform needs. Keeping buffers dedicated
//! per worker avoids any cross-thread contention on the hot path.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::config::PlanStrategy;
use crate::types::IqSample;

/// A planned length-N complex forward DFT with dedicated buffers
///
/// The transform is out of place: the caller's input buffer is consumed as
/// working storage (its contents are destroyed) and the spectrum lands in the
/// engine's own output buffer.
pub struct FftEngine {
    fft: Arc<dyn Fft<f32>>,
    output: Vec<IqSample>,
    scratch: Vec<IqSample>,
}

impl FftEngine {
    /// Plan a forward transform of length `n`
    ///
    /// `Measure` and `Exhaustive` run warm-up transforms so twiddle tables
    /// and caches are primed before the first real frame arrives.
    pub fn new(planner: &mut FftPlanner<f32>, n: usize, strategy: PlanStrategy) -> Self {
        let fft = planner.plan_fft_forward(n);
        let scratch_len = fft.get_outofplace_scratch_len();
        let mut engine = Self {
            output: vec![IqSample::default(); n],
            scratch: vec![IqSample::default(); scratch_len],
            fft,
        };

        let mut probe = vec![IqSample::default(); n];
        for _ in 0..strategy.warmup_passes() {
            engine.forward(&mut probe);
        }
        engine
    }

    /// Transform length of this plan
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Execute the forward DFT of `input`, returning the spectrum
    ///
    /// `input` must be exactly `len()` samples and is destroyed by the
    /// transform.
    pub fn forward(&mut self, input: &mut [IqSample]) -> &[IqSample] {
        self.fft
            .process_outofplace_with_scratch(input, &mut self.output, &mut self.scratch);
        &self.output
    }
}
