//! Lock-free circular buffer for session lines
//!
//! Writers claim a slot with a single `fetch_add` on the write cursor and swap
//! their line into it, so appends never block each other. Two writers that
//! wrap onto the same slot race benignly: the last store wins. The stored
//! count saturates at capacity and is only advisory under heavy contention.
//!
//! Reads (`converge`) are snapshots: appends that land while the buffer is
//! being walked may or may not show up in the result.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Fixed-capacity, append-only ring of log lines
pub struct RingBuffer {
    /// One lock-free cell per slot; `None` until first written
    slots: Box<[ArcSwapOption<String>]>,
    /// Number of slots
    capacity: usize,
    /// Monotonic position of the next write (wraps via modulo)
    write_cursor: AtomicUsize,
    /// Entries stored so far, saturating at `capacity`
    stored: AtomicUsize,
}

impl RingBuffer {
    /// Create a ring with `capacity` empty slots
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be greater than 0");

        Self {
            slots: (0..capacity).map(|_| ArcSwapOption::empty()).collect(),
            capacity,
            write_cursor: AtomicUsize::new(0),
            stored: AtomicUsize::new(0),
        }
    }

    /// Append a line, overwriting the oldest one once the ring is full
    pub fn append(&self, entry: impl Into<String>) {
        let cursor = self.write_cursor.fetch_add(1, Ordering::Relaxed);
        self.slots[cursor % self.capacity].store(Some(Arc::new(entry.into())));

        let mut current = self.stored.load(Ordering::Relaxed);
        while current < self.capacity {
            match self.stored.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Join the stored lines, oldest first, with `\n`
    ///
    /// Empty slots are skipped. An empty ring converges to `""`.
    pub fn converge(&self) -> String {
        let stored = self.stored.load(Ordering::Acquire);
        if stored == 0 {
            return String::new();
        }
        let cursor = self.write_cursor.load(Ordering::Acquire);

        let mut lines: Vec<Arc<String>> = Vec::with_capacity(stored.min(self.capacity));
        if stored < self.capacity {
            // Never wrapped: slots [0, stored) are in write order
            lines.extend(self.slots[..stored].iter().filter_map(|slot| slot.load_full()));
        } else {
            let start = cursor % self.capacity;
            for offset in 0..self.capacity {
                if let Some(line) = self.slots[(start + offset) % self.capacity].load_full() {
                    lines.push(line);
                }
            }
        }

        let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line);
        }
        out
    }

    /// Reset the ring to empty, keeping its slots allocated
    ///
    /// Not atomic with respect to concurrent appends: a line written while
    /// the ring is being cleared can be lost.
    pub fn clear(&self) {
        self.write_cursor.store(0, Ordering::Release);
        self.stored.store(0, Ordering::Release);
        for slot in self.slots.iter() {
            slot.store(None);
        }
    }

    /// Number of stored lines (at most `capacity`)
    pub fn len(&self) -> usize {
        self.stored.load(Ordering::Acquire)
    }

    /// Check if nothing has been stored since creation or the last clear
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of lines held
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("stored", &self.len())
            .finish()
    }
}
