//! Energy-bin reduction
//!
//! The simple companion to the STFT path: sum `i^2 + q^2` over fixed-size
//! runs of samples and emit one 64-bit float per bin. Accumulation happens
//! in f64 so long bins do not lose low-order energy.

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

use crate::config::{ConfigError, EnergyConfig};
use crate::types::IQ_SAMPLE_BYTES;

#[derive(Error, Debug)]
pub enum EnergyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("input read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("output write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// What an energy run consumed and produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnergyStats {
    /// Complete bins written
    pub bins: u64,
    /// Samples consumed, including any incomplete final bin
    pub samples_in: u64,
    /// Samples discarded from an incomplete final bin
    pub leftover: u64,
}

/// Stream samples from `input` and write one little-endian f64 per full bin
///
/// An incomplete final bin is discarded, matching the recorded-capture
/// convention of the STFT path's tail handling.
pub fn run<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    config: &EnergyConfig,
) -> Result<EnergyStats, EnergyError> {
    config.validate()?;

    let mut stats = EnergyStats::default();
    let mut chunk = vec![0u8; config.bin_size.min(8192) * IQ_SAMPLE_BYTES];
    let mut energy = 0.0f64;
    let mut in_bin = 0usize;
    let mut pending = [0u8; IQ_SAMPLE_BYTES];
    let mut pending_len = 0usize;

    loop {
        let read = match input.read(&mut chunk[pending_len..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(EnergyError::Read(e)),
        };

        // splice any partial sample left from the previous chunk
        chunk[..pending_len].copy_from_slice(&pending[..pending_len]);
        let total = pending_len + read;
        let whole = total - total % IQ_SAMPLE_BYTES;
        pending_len = total - whole;
        pending[..pending_len].copy_from_slice(&chunk[whole..total]);

        for pair in chunk[..whole].chunks_exact(IQ_SAMPLE_BYTES) {
            let i = f32::from_le_bytes(pair[0..4].try_into().unwrap()) as f64;
            let q = f32::from_le_bytes(pair[4..8].try_into().unwrap()) as f64;
            energy += i * i + q * q;
            stats.samples_in += 1;
            in_bin += 1;

            if in_bin == config.bin_size {
                output
                    .write_all(&energy.to_le_bytes())
                    .map_err(EnergyError::Write)?;
                stats.bins += 1;
                energy = 0.0;
                in_bin = 0;
            }
        }
    }

    stats.leftover = in_bin as u64;
    if in_bin > 0 {
        log::info!("discarding incomplete final bin of {} samples", in_bin);
    }
    output.flush().map_err(EnergyError::Write)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn capture_bytes(samples: &[(f32, f32)]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for &(i, q) in samples {
            bytes.extend_from_slice(&i.to_le_bytes());
            bytes.extend_from_slice(&q.to_le_bytes());
        }
        bytes
    }

    fn output_bins(bytes: &[u8]) -> Vec<f64> {
        bytes
            .chunks_exact(8)
            .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn test_single_bin_sums_squared_magnitudes() {
        let input = capture_bytes(&[(1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 0.0)]);
        let mut output = Vec::new();
        let stats = run(Cursor::new(input), &mut output, &EnergyConfig { bin_size: 4 }).unwrap();

        assert_eq!(stats.bins, 1);
        assert_eq!(stats.samples_in, 4);
        assert_eq!(stats.leftover, 0);
        assert_eq!(output_bins(&output), vec![8.0]);
    }

    #[test]
    fn test_multiple_bins_and_leftover() {
        let input = capture_bytes(&[
            (1.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (0.0, 2.0),
            (3.0, 0.0), // incomplete bin, discarded
        ]);
        let mut output = Vec::new();
        let stats = run(Cursor::new(input), &mut output, &EnergyConfig { bin_size: 2 }).unwrap();

        assert_eq!(stats.bins, 2);
        assert_eq!(stats.samples_in, 5);
        assert_eq!(stats.leftover, 1);
        assert_eq!(output_bins(&output), vec![2.0, 8.0]);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let mut output = Vec::new();
        let stats = run(
            Cursor::new(Vec::new()),
            &mut output,
            &EnergyConfig { bin_size: 8 },
        )
        .unwrap();

        assert_eq!(stats.bins, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_zero_bin_size_is_rejected() {
        let mut output = Vec::new();
        let err = run(
            Cursor::new(Vec::new()),
            &mut output,
            &EnergyConfig { bin_size: 0 },
        )
        .unwrap_err();
        assert!(matches!(err, EnergyError::Config(ConfigError::ZeroBinSize)));
    }

    #[test]
    fn test_accumulates_in_f64() {
        // values whose squares would collapse in f32 accumulation
        let samples: Vec<(f32, f32)> = std::iter::once((4096.0, 0.0))
            .chain(std::iter::repeat((0.015625, 0.0)).take(1023))
            .collect();
        let input = capture_bytes(&samples);
        let mut output = Vec::new();
        run(
            Cursor::new(input),
            &mut output,
            &EnergyConfig { bin_size: 1024 },
        )
        .unwrap();

        let expected = 4096.0f64 * 4096.0 + 1023.0 * (0.015625f64 * 0.015625);
        let bins = output_bins(&output);
        assert!((bins[0] - expected).abs() < 1e-6);
    }
}
