//! Worker threads
//!
//! Each worker idles on a capacity-1 inbox until the dispatcher posts a
//! frame. It then windows the frame in place, runs its private FFT plan,
//! takes magnitudes, waits for the writer ticket, and emits the half-swapped
//! spectrum under the output mutex before handing its scratch buffer back.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam::channel::{Receiver, Sender};

use crate::fft::FftEngine;
use crate::window::WindowTable;

use super::pool::WriteFailure;
use super::ticket::WriterTicket;
use super::FrameBuf;

/// Commands accepted by a worker's inbox
pub(super) enum WorkerCommand {
    /// Compute one frame; carries the frame buffer into the worker
    Start(FrameBuf),
    /// Leave the command loop and let the thread exit
    Kill,
}

/// Everything a worker thread owns or shares
pub(super) struct WorkerContext<W> {
    pub id: usize,
    pub engine: FftEngine,
    pub window: Arc<WindowTable>,
    pub inbox: Receiver<WorkerCommand>,
    /// Spent frame buffers go back to the dispatcher through here
    pub scratch_return: Sender<FrameBuf>,
    /// True while this worker is mid-frame; the spin-mode dispatch wait
    pub busy: Arc<AtomicBool>,
    pub ticket: Arc<WriterTicket>,
    pub writer: Arc<Mutex<W>>,
    pub failure: Arc<WriteFailure>,
}

/// Worker thread body
pub(super) fn run<W: Write + Send>(mut ctx: WorkerContext<W>) {
    let mut magnitude = vec![0.0f32; ctx.engine.len()];

    while let Ok(command) = ctx.inbox.recv() {
        let mut frame = match command {
            WorkerCommand::Kill => break,
            WorkerCommand::Start(frame) => frame,
        };

        ctx.busy.store(true, Ordering::Release);

        ctx.window.apply(&mut frame);
        let spectrum = ctx.engine.forward(&mut frame);
        for (mag, bin) in magnitude.iter_mut().zip(spectrum) {
            *mag = bin.norm();
        }

        // our turn in the global write order, then the stream itself
        ctx.ticket.wait_turn(ctx.id);
        {
            let mut out = ctx.writer.lock().unwrap();
            // after a write failure the run is over; keep rotating the
            // ticket so nobody deadlocks waiting on this worker
            if !ctx.failure.is_failed() {
                if let Err(e) = write_frame(&mut *out, &magnitude) {
                    log::error!("worker {}: output write failed: {}", ctx.id, e);
                    ctx.failure.record(e);
                }
            }
            ctx.ticket.advance(ctx.id);
        }

        ctx.busy.store(false, Ordering::Release);
        if ctx.scratch_return.send(frame).is_err() {
            // pool side is gone; nothing left to compute for
            break;
        }
    }
}

/// Write one frame: negative-frequency magnitudes (upper DFT bins) first,
/// then positive (lower bins), each as little-endian f32
fn write_frame<W: Write>(out: &mut W, magnitude: &[f32]) -> std::io::Result<()> {
    let half = magnitude.len() / 2;
    for &mag in &magnitude[half..] {
        out.write_all(&mag.to_le_bytes())?;
    }
    for &mag in &magnitude[..half] {
        out.write_all(&mag.to_le_bytes())?;
    }
    Ok(())
}
