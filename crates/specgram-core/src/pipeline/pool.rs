//! Worker pool lifecycle
//!
//! Owns the worker threads and everything shared with them: the writer
//! ticket, the output stream, and the write-failure slot. Construction
//! tears down cleanly if it fails partway, and shutdown drains in-flight
//! frames before killing and joining every thread.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Receiver, Sender};
use rustfft::FftPlanner;

use crate::config::{StftConfig, WaitStrategy};
use crate::fft::FftEngine;
use crate::types::IqSample;
use crate::window::WindowTable;

use super::error::PipelineError;
use super::ticket::WriterTicket;
use super::worker::{self, WorkerCommand, WorkerContext};
use super::FrameBuf;

/// First write error of the run, shared by all workers
#[derive(Default)]
pub(super) struct WriteFailure {
    failed: AtomicBool,
    error: Mutex<Option<std::io::Error>>,
}

impl WriteFailure {
    pub fn record(&self, err: std::io::Error) {
        let mut slot = self.error.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
        self.failed.store(true, Ordering::Release);
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn take(&self) -> Option<std::io::Error> {
        self.error.lock().unwrap().take()
    }
}

/// Dispatcher-side view of one worker
struct WorkerSlot {
    inbox: Sender<WorkerCommand>,
    /// Idle scratch buffers come back through here; empty means busy
    scratch_rx: Receiver<FrameBuf>,
    busy: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

pub(super) struct WorkerPool<W: Write + Send + 'static> {
    slots: Vec<WorkerSlot>,
    writer: Arc<Mutex<W>>,
    failure: Arc<WriteFailure>,
    wait: WaitStrategy,
}

impl<W: Write + Send + 'static> WorkerPool<W> {
    /// Build plans, channels, and threads for `config.workers` workers
    ///
    /// If a thread fails to spawn, the workers already running are killed
    /// and joined before the error is returned, so a half-built pool never
    /// leaks threads.
    pub fn spawn(
        config: &StftConfig,
        window: Arc<WindowTable>,
        writer: W,
    ) -> Result<Self, PipelineError> {
        let n = config.fft_size;
        let writer = Arc::new(Mutex::new(writer));
        let ticket = Arc::new(WriterTicket::new(config.workers, config.wait));
        let failure = Arc::new(WriteFailure::default());
        let mut planner = FftPlanner::new();
        let mut slots: Vec<WorkerSlot> = Vec::with_capacity(config.workers);

        for id in 0..config.workers {
            let engine = FftEngine::new(&mut planner, n, config.plan);
            let (inbox_tx, inbox_rx) = bounded(1);
            let (scratch_tx, scratch_rx) = bounded(1);
            // seed the slot with its one circulating frame buffer
            scratch_tx
                .send(vec![IqSample::default(); n])
                .expect("fresh scratch channel cannot be full");
            let busy = Arc::new(AtomicBool::new(false));

            let context = WorkerContext {
                id,
                engine,
                window: Arc::clone(&window),
                inbox: inbox_rx,
                scratch_return: scratch_tx,
                busy: Arc::clone(&busy),
                ticket: Arc::clone(&ticket),
                writer: Arc::clone(&writer),
                failure: Arc::clone(&failure),
            };

            let spawned = thread::Builder::new()
                .name(format!("fft-worker-{id}"))
                .spawn(move || worker::run(context));

            match spawned {
                Ok(handle) => slots.push(WorkerSlot {
                    inbox: inbox_tx,
                    scratch_rx,
                    busy,
                    handle: Some(handle),
                }),
                Err(e) => {
                    Self::kill_and_join(&mut slots);
                    return Err(PipelineError::Spawn(e));
                }
            }
        }

        Ok(Self {
            slots,
            writer,
            failure,
            wait: config.wait,
        })
    }

    /// Reclaim worker `id`'s frame buffer, waiting while it is still busy
    ///
    /// This is the backpressure point: the dispatcher cannot overtake a
    /// worker that has not finished its previous frame.
    pub fn acquire_scratch(&self, id: usize) -> Result<FrameBuf, PipelineError> {
        if self.wait == WaitStrategy::Spin {
            while self.slots[id].busy.load(Ordering::Acquire) {
                std::hint::spin_loop();
            }
        }
        self.slots[id]
            .scratch_rx
            .recv()
            .map_err(|_| PipelineError::WorkerLost(id))
    }

    /// Post a frame to worker `id`'s inbox
    pub fn dispatch(&self, id: usize, frame: FrameBuf) -> Result<(), PipelineError> {
        self.slots[id]
            .inbox
            .send(WorkerCommand::Start(frame))
            .map_err(|_| PipelineError::WorkerLost(id))
    }

    /// True once any worker has hit a write error
    pub fn write_failed(&self) -> bool {
        self.failure.is_failed()
    }

    /// Drain in-flight frames, kill every worker, join, and flush
    ///
    /// Surfaces the first write error recorded during the run, if any.
    pub fn shutdown(mut self) -> Result<(), PipelineError> {
        let mut lost = None;

        // wait for every in-flight frame by taking each scratch back
        for (id, slot) in self.slots.iter().enumerate() {
            if slot.scratch_rx.recv().is_err() && lost.is_none() {
                lost = Some(id);
            }
        }
        for slot in &self.slots {
            let _ = slot.inbox.send(WorkerCommand::Kill);
        }
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if let Some(handle) = slot.handle.take() {
                if handle.join().is_err() && lost.is_none() {
                    lost = Some(id);
                }
            }
        }

        if let Some(err) = self.failure.take() {
            return Err(PipelineError::Write(err));
        }
        if let Some(id) = lost {
            return Err(PipelineError::WorkerLost(id));
        }
        self.writer
            .lock()
            .unwrap()
            .flush()
            .map_err(PipelineError::Write)
    }

    /// Teardown path for a partially constructed pool
    fn kill_and_join(slots: &mut Vec<WorkerSlot>) {
        for slot in slots.iter() {
            let _ = slot.inbox.send(WorkerCommand::Kill);
        }
        for slot in slots.iter_mut() {
            if let Some(handle) = slot.handle.take() {
                let _ = handle.join();
            }
        }
        slots.clear();
    }
}
