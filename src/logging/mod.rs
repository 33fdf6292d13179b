//! Session logging engine
//!
//! Provides the lock-free session buffer, log directory resolution, file
//! naming and rotation, session file writing, retention cleanup, and the
//! live in-memory history used by viewers.

mod history;
mod live;
mod location;
pub mod naming;
mod retention;
mod ring;
mod writer;

pub use history::{SessionAccumulator, SessionSink};
pub use live::{LiveHistory, LogEntry};
pub use location::{ensure_dir, executable_dir, LogLocation};
pub use naming::{AppendingMode, FileTarget};
pub use retention::{clean_old_logs, DEFAULT_RETENTION_DAYS};
pub use ring::RingBuffer;
pub use writer::{format_timestamp, SessionWriter, WriterSettings, TIMESTAMP_FORMAT};
