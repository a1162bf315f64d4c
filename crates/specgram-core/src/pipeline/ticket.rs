//! Ordered-writer ticket
//!
//! A shared counter naming the worker currently allowed to write. Workers
//! are dispatched round-robin and the ticket rotates the same way, so as
//! long as every worker waits its turn and advances after writing, frames
//! land in the output in dispatch order with no central writer thread.
//!
//! The counter is an atomic with acquire/release pairing at the
//! advance/observe edges. `Block` mode parks waiters on a condition
//! variable; `Spin` mode busy-waits, which is the lower-latency choice when
//! frames compute in well under a millisecond.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

use crate::config::WaitStrategy;

pub struct WriterTicket {
    next: AtomicUsize,
    workers: usize,
    wait: WaitStrategy,
    lock: Mutex<()>,
    turn: Condvar,
}

impl WriterTicket {
    pub fn new(workers: usize, wait: WaitStrategy) -> Self {
        Self {
            next: AtomicUsize::new(0),
            workers,
            wait,
            lock: Mutex::new(()),
            turn: Condvar::new(),
        }
    }

    /// Block until it is `id`'s turn to write
    pub fn wait_turn(&self, id: usize) {
        match self.wait {
            WaitStrategy::Spin => {
                while self.next.load(Ordering::Acquire) != id {
                    std::hint::spin_loop();
                }
            }
            WaitStrategy::Block => {
                let mut guard = self.lock.lock().unwrap();
                while self.next.load(Ordering::Acquire) != id {
                    guard = self.turn.wait(guard).unwrap();
                }
            }
        }
    }

    /// Hand the ticket to the next worker in rotation and wake waiters
    ///
    /// Called by the current holder after its write, while it still holds
    /// the output mutex. The store happens under the ticket lock so a
    /// blocking waiter cannot miss its wake-up.
    pub fn advance(&self, id: usize) {
        debug_assert_eq!(self.next.load(Ordering::Acquire), id);
        let next = if id + 1 == self.workers { 0 } else { id + 1 };
        let _guard = self.lock.lock().unwrap();
        self.next.store(next, Ordering::Release);
        self.turn.notify_all();
    }

    #[cfg(test)]
    pub fn current(&self) -> usize {
        self.next.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_rotation_wraps_to_zero() {
        let ticket = WriterTicket::new(3, WaitStrategy::Block);
        assert_eq!(ticket.current(), 0);
        ticket.advance(0);
        assert_eq!(ticket.current(), 1);
        ticket.advance(1);
        assert_eq!(ticket.current(), 2);
        ticket.advance(2);
        assert_eq!(ticket.current(), 0);
    }

    fn assert_serialized_in_id_order(wait: WaitStrategy) {
        let workers = 4;
        let rounds = 8;
        let ticket = Arc::new(WriterTicket::new(workers, wait));
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let ticket = Arc::clone(&ticket);
                let order = Arc::clone(&order);
                thread::spawn(move || {
                    for round in 0..rounds {
                        ticket.wait_turn(id);
                        order.lock().unwrap().push(round * workers + id);
                        ticket.advance(id);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let order = order.lock().unwrap();
        let expected: Vec<usize> = (0..workers * rounds).collect();
        assert_eq!(*order, expected);
    }

    #[test]
    fn test_block_mode_serializes_writers() {
        assert_serialized_in_id_order(WaitStrategy::Block);
    }

    #[test]
    fn test_spin_mode_serializes_writers() {
        assert_serialized_in_id_order(WaitStrategy::Spin);
    }
}
