//! logroll - in-process leveled logging with rotating session files
//!
//! Records are buffered per session in a lock-free ring and written to a
//! family of log files (`Log.log`, `Log-1.log`, ...) according to the
//! configured appending mode.

pub mod config;
pub mod error;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
pub use hooks::{Hooks, LevelHook, MessageHook};
pub use level::Level;
pub use logger::Logger;
