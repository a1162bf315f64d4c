//! Common types for the specgram pipeline

use rustfft::num_complex::Complex;

/// One complex baseband sample (I = real, Q = imaginary).
pub type IqSample = Complex<f32>;

/// On-disk size of one I/Q sample: two little-endian f32s, interleaved I then Q.
pub const IQ_SAMPLE_BYTES: usize = 8;

/// On-disk size of one magnitude value in STFT output.
pub const MAGNITUDE_BYTES: usize = 4;

/// On-disk size of one energy bin in energy-bin output.
pub const ENERGY_BIN_BYTES: usize = 8;
