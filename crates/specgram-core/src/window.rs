//! Window coefficient table
//!
//! A window is a flat file of raw little-endian f32 coefficients with no
//! header. A window shorter than the FFT size is left-justified and
//! zero-padded; a longer one rejects the run. With no file at all the
//! uniform (all-ones) window applies.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::types::IqSample;

/// Errors raised while loading a window file
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("cannot open window file: {0}")]
    Io(#[from] std::io::Error),

    /// More coefficients than FFT bins
    #[error("window is too large: {coefficients} coefficients for FFT size {fft_size}")]
    TooLarge {
        coefficients: usize,
        fft_size: usize,
    },
}

/// Immutable window table of exactly `fft_size` real coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    coeffs: Vec<f32>,
}

impl WindowTable {
    /// The uniform window: every coefficient 1.0
    pub fn ones(fft_size: usize) -> Self {
        Self {
            coeffs: vec![1.0; fft_size],
        }
    }

    /// Load coefficients from a raw f32 file, zero-padding up to `fft_size`
    ///
    /// Trailing bytes that do not form a whole f32 are ignored, matching the
    /// file-length-in-floats convention of the window format.
    pub fn from_file(path: &Path, fft_size: usize) -> Result<Self, WindowError> {
        let bytes = fs::read(path)?;
        let coefficients = bytes.len() / 4;
        if coefficients > fft_size {
            return Err(WindowError::TooLarge {
                coefficients,
                fft_size,
            });
        }

        let mut coeffs: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
            .collect();

        if coeffs.len() < fft_size {
            log::warn!(
                "window has {} coefficients, zero-padding to FFT size {}",
                coeffs.len(),
                fft_size
            );
            coeffs.resize(fft_size, 0.0);
        }

        Ok(Self { coeffs })
    }

    /// Build a table directly from coefficients (must already be full length)
    pub fn from_coeffs(coeffs: Vec<f32>) -> Self {
        Self { coeffs }
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }

    /// Multiply a frame by the window, element-wise and in place
    pub fn apply(&self, frame: &mut [IqSample]) {
        for (sample, &coeff) in frame.iter_mut().zip(&self.coeffs) {
            *sample = *sample * coeff;
        }
    }
}
