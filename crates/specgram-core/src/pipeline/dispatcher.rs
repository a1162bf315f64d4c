//! Frame dispatcher
//!
//! The main control flow of an STFT run: reads the source hop by hop into
//! the ring, hands completed frames to workers in round-robin order, and
//! coordinates shutdown on end of input or failure.

use std::io::Write;
use std::sync::Arc;

use crate::config::StftConfig;
use crate::source::SampleSource;
use crate::window::WindowTable;

use super::error::PipelineError;
use super::pool::WorkerPool;
use super::ring::FrameRing;

/// What a finished run consumed and produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Frames dispatched, and therefore blocks written
    pub frames: u64,
    /// Whole hops consumed from the source
    pub samples_in: u64,
    /// The input ended partway through a hop; the tail was discarded
    pub tail_underrun: bool,
    /// Receiver overflows reported along the way (live sources only)
    pub overflows: u64,
}

/// Run the overlapped STFT pipeline to completion
///
/// Consumes the source until it ends (or fails) and writes every frame's
/// magnitude spectrum to `writer` in dispatch order. The window must have
/// exactly `config.fft_size` coefficients.
///
/// Frame count for an input of `L` samples is `(L - N) / hop + 1` (zero if
/// the input never fills a frame); no frames are dropped under load, the
/// dispatcher blocks instead.
pub fn run<S, W>(
    config: &StftConfig,
    window: WindowTable,
    source: &mut S,
    writer: W,
) -> Result<RunStats, PipelineError>
where
    S: SampleSource,
    W: Write + Send + 'static,
{
    config.validate()?;
    debug_assert_eq!(window.len(), config.fft_size);

    let pool = WorkerPool::spawn(config, Arc::new(window), writer)?;
    let mut stats = RunStats::default();
    let outcome = dispatch_loop(config, source, &pool, &mut stats);

    log::debug!(
        "dispatch finished: {} frames from {} samples",
        stats.frames,
        stats.samples_in
    );

    let shutdown = pool.shutdown();
    outcome.and(shutdown)?;
    Ok(stats)
}

/// Read hops and dispatch frames until the source ends or something fails
fn dispatch_loop<S, W>(
    config: &StftConfig,
    source: &mut S,
    pool: &WorkerPool<W>,
    stats: &mut RunStats,
) -> Result<(), PipelineError>
where
    S: SampleSource,
    W: Write + Send + 'static,
{
    let hop = config.hop();
    let mut ring = FrameRing::new(config.fft_size, hop);
    let mut next_worker = 0;

    loop {
        if pool.write_failed() {
            // shutdown surfaces the recorded error
            return Ok(());
        }

        let recv = source.recv(ring.fill_slot())?;
        if recv.overflow {
            stats.overflows += 1;
            // single-character indicator so a live console stays readable
            print!("O");
            let _ = std::io::stdout().flush();
        }
        if recv.samples < hop {
            if recv.samples > 0 {
                stats.tail_underrun = true;
                log::warn!(
                    "input ended with an unaligned tail; discarding {} samples",
                    recv.samples
                );
            }
            return Ok(());
        }

        stats.samples_in += hop as u64;
        if ring.commit_hop() {
            let mut frame = pool.acquire_scratch(next_worker)?;
            ring.copy_ordered_into(&mut frame);
            pool.dispatch(next_worker, frame)?;
            stats.frames += 1;
            next_worker = if next_worker + 1 == config.workers {
                0
            } else {
                next_worker + 1
            };
        }
    }
}
