//! Pipeline configuration
//!
//! All configuration arrives on the command line and is validated here,
//! before any worker thread spawns or any output byte is written.

use thiserror::Error;

/// Errors raised while validating a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// FFT size of zero
    #[error("FFT size must be positive")]
    ZeroFftSize,

    /// Overlap factor of zero
    #[error("overlap factor must be at least 1")]
    ZeroOverlap,

    /// Overlap factor does not divide the FFT size
    #[error("incompatible FFT size and overlap factor: size {size}, overlap {overlap}, remainder {remainder}")]
    IncompatibleOverlap {
        size: usize,
        overlap: usize,
        remainder: usize,
    },

    /// Fewer than one worker requested
    #[error("need at least one worker thread")]
    NoWorkers,

    /// Energy bin size of zero
    #[error("energy bin size must be positive")]
    ZeroBinSize,
}

/// How much up-front work to spend preparing each worker's FFT plan
///
/// `Estimate` plans lazily and pays first-use cost on the first frame.
/// `Measure` and `Exhaustive` run warm-up transforms at startup so long
/// runs see undisturbed steady-state throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanStrategy {
    Estimate,
    Measure,
    #[default]
    Exhaustive,
}

impl PlanStrategy {
    /// Number of warm-up transforms executed during plan construction
    pub fn warmup_passes(self) -> usize {
        match self {
            PlanStrategy::Estimate => 0,
            PlanStrategy::Measure => 1,
            PlanStrategy::Exhaustive => 4,
        }
    }
}

/// How the dispatcher and workers wait on each other
///
/// `Block` parks on condition variables and channel receives. `Spin`
/// busy-waits on the cross-thread flags instead, which shaves wake-up
/// latency when frame compute times are well under a millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitStrategy {
    #[default]
    Block,
    Spin,
}

/// Configuration for an STFT run
#[derive(Debug, Clone)]
pub struct StftConfig {
    /// FFT size `N`: samples per frame and magnitudes per output block
    pub fft_size: usize,
    /// Overlap factor `O`: a frame is taken every `N / O` samples
    pub overlap: usize,
    /// Worker thread count `W`
    pub workers: usize,
    /// FFT plan construction strategy
    pub plan: PlanStrategy,
    /// Wait strategy for the busy/ticket hand-offs
    pub wait: WaitStrategy,
}

impl StftConfig {
    pub fn new(fft_size: usize, overlap: usize, workers: usize) -> Self {
        Self {
            fft_size,
            overlap,
            workers,
            plan: PlanStrategy::default(),
            wait: WaitStrategy::default(),
        }
    }

    /// Sample advance between consecutive frames
    pub fn hop(&self) -> usize {
        self.fft_size / self.overlap
    }

    /// Check the size/overlap/worker invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size == 0 {
            return Err(ConfigError::ZeroFftSize);
        }
        if self.overlap == 0 {
            return Err(ConfigError::ZeroOverlap);
        }
        if self.fft_size % self.overlap != 0 {
            return Err(ConfigError::IncompatibleOverlap {
                size: self.fft_size,
                overlap: self.overlap,
                remainder: self.fft_size % self.overlap,
            });
        }
        if self.workers < 1 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

/// Configuration for an energy-bin run
#[derive(Debug, Clone, Copy)]
pub struct EnergyConfig {
    /// Number of consecutive samples summed into one bin
    pub bin_size: usize,
}

impl EnergyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bin_size == 0 {
            return Err(ConfigError::ZeroBinSize);
        }
        Ok(())
    }
}

/// Receiver tuning for the live SDR variant
///
/// The device driver itself lives behind [`crate::source::IqReceiver`]; this
/// struct only carries the configuration surface the core recognizes.
#[derive(Debug, Clone)]
pub struct SdrConfig {
    /// Device address string, passed through to the driver
    pub address: String,
    /// Center frequency in Hz
    pub center_hz: f64,
    /// Requested sample rate in Hz
    pub sample_rate_hz: f64,
    /// RX gain in dB
    pub gain_db: f64,
    /// Capture duration in seconds
    pub seconds: f64,
}

impl SdrConfig {
    /// Total sample cap bounding the run: `rate * duration`
    pub fn max_samples(&self) -> u64 {
        (self.sample_rate_hz * self.seconds) as u64
    }
}
