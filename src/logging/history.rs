//! In-memory session log with automatic flush
//!
//! Wraps a [`RingBuffer`] sized to the per-file line limit. When an append
//! fills the ring, the accumulated session is handed to a [`SessionSink`]
//! and the ring is cleared, but only if the sink accepted it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::Result;

use super::ring::RingBuffer;

/// Destination for a converged session
pub trait SessionSink: Send + Sync {
    /// Persist `session_text`, returning the file it was written to
    fn persist(&self, session_text: &str) -> Result<PathBuf>;
}

/// Accumulates session lines and flushes them when the ring fills up
pub struct SessionAccumulator {
    ring: RingBuffer,
    limit_per_file: usize,
    sink: Arc<dyn SessionSink>,
    /// Full-ring appends to let pass before retrying a failed auto-flush
    retry_after: AtomicUsize,
}

impl SessionAccumulator {
    /// Create an accumulator holding up to `limit_per_file` lines
    ///
    /// # Panics
    ///
    /// Panics if `limit_per_file` is zero.
    pub fn new(limit_per_file: usize, sink: Arc<dyn SessionSink>) -> Self {
        Self {
            ring: RingBuffer::new(limit_per_file),
            limit_per_file,
            sink,
            retry_after: AtomicUsize::new(0),
        }
    }

    /// Append a line, flushing the session if this append filled the ring
    ///
    /// The full-check is not synchronized with other writers: several threads
    /// can observe the limit at once and each flush. Extra flushes write a
    /// duplicate session block at worst.
    ///
    /// After a failed auto-flush the ring stays full, so the next
    /// `limit_per_file - 1` appends skip the write and the one after retries.
    pub fn add(&self, entry: impl Into<String>) {
        self.ring.append(entry);

        if self.ring.len() != self.limit_per_file {
            return;
        }
        let backing_off = self
            .retry_after
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if backing_off {
            return;
        }
        // Errors are already reported by `flush`; the lines stay buffered
        if self.flush().is_err() {
            self.retry_after.store(self.limit_per_file - 1, Ordering::Relaxed);
        }
    }

    /// Persist the current session and clear the ring on success
    ///
    /// On failure the ring is left untouched so a later flush can retry.
    pub fn flush(&self) -> Result<PathBuf> {
        let text = self.ring.converge();
        match self.sink.persist(&text) {
            Ok(path) => {
                self.ring.clear();
                self.retry_after.store(0, Ordering::Relaxed);
                tracing::debug!("Flushed session log to {}", path.display());
                Ok(path)
            }
            Err(e) => {
                tracing::warn!("Failed to flush session log, keeping buffered lines: {}", e);
                Err(e)
            }
        }
    }

    /// Persist the current session without clearing it
    pub fn save(&self) -> Result<PathBuf> {
        self.sink.persist(&self.ring.converge())
    }

    /// Current session text, oldest line first
    pub fn converge(&self) -> String {
        self.ring.converge()
    }

    /// Number of buffered lines
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Check if no lines are buffered
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Line limit per file (and ring capacity)
    pub fn limit_per_file(&self) -> usize {
        self.limit_per_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::thread;

    /// Sink that records every persisted session
    #[derive(Default)]
    struct RecordingSink {
        sessions: Mutex<Vec<String>>,
        fail: AtomicBool,
        attempts: AtomicUsize,
    }

    impl SessionSink for RecordingSink {
        fn persist(&self, session_text: &str) -> Result<PathBuf> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Config("sink unavailable".to_string()));
            }
            self.sessions.lock().unwrap().push(session_text.to_string());
            Ok(PathBuf::from("recorded.log"))
        }
    }

    #[test]
    fn test_flushes_exactly_at_limit() {
        let sink = Arc::new(RecordingSink::default());
        let history = SessionAccumulator::new(5, sink.clone());

        for i in 0..4 {
            history.add(format!("Log {}", i));
        }
        assert!(sink.sessions.lock().unwrap().is_empty());
        assert_eq!(history.len(), 4);

        history.add("Log 4");
        let sessions = sink.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], "Log 0\nLog 1\nLog 2\nLog 3\nLog 4");
        assert!(history.is_empty());
    }

    #[test]
    fn test_entries_after_flush_start_new_session() {
        let sink = Arc::new(RecordingSink::default());
        let history = SessionAccumulator::new(3, sink.clone());

        for i in 0..5 {
            history.add(format!("Log {}", i));
        }

        assert_eq!(sink.sessions.lock().unwrap().len(), 1);
        assert_eq!(history.converge(), "Log 3\nLog 4");
    }

    #[test]
    fn test_failed_flush_keeps_lines() {
        let sink = Arc::new(RecordingSink::default());
        sink.fail.store(true, Ordering::SeqCst);
        let history = SessionAccumulator::new(2, sink.clone());

        history.add("a");
        history.add("b");

        assert_eq!(history.converge(), "a\nb");
        assert!(history.flush().is_err());

        sink.fail.store(false, Ordering::SeqCst);
        assert!(history.flush().is_ok());
        assert!(history.is_empty());
        assert_eq!(sink.sessions.lock().unwrap().as_slice(), ["a\nb"]);
    }

    #[test]
    fn test_failing_sink_retried_once_per_limit() {
        let sink = Arc::new(RecordingSink::default());
        sink.fail.store(true, Ordering::SeqCst);
        let history = SessionAccumulator::new(3, sink.clone());

        for i in 0..3 {
            history.add(format!("Log {}", i));
        }
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

        history.add("Log 3");
        history.add("Log 4");
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

        history.add("Log 5");
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);

        sink.fail.store(false, Ordering::SeqCst);
        for i in 6..9 {
            history.add(format!("Log {}", i));
        }
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sink.sessions.lock().unwrap().as_slice(), ["Log 6\nLog 7\nLog 8"]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_does_not_clear() {
        let sink = Arc::new(RecordingSink::default());
        let history = SessionAccumulator::new(10, sink.clone());

        history.add("kept");
        history.save().unwrap();

        assert_eq!(history.converge(), "kept");
        assert_eq!(sink.sessions.lock().unwrap().as_slice(), ["kept"]);
    }

    #[test]
    fn test_concurrent_adds_flush_at_least_once() {
        let sink = Arc::new(RecordingSink::default());
        let history = Arc::new(SessionAccumulator::new(50, sink.clone()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let history = Arc::clone(&history);
                thread::spawn(move || {
                    for i in 0..100 {
                        history.add(format!("{}:{}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!sink.sessions.lock().unwrap().is_empty());
        assert!(history.len() <= 50);
    }
}
