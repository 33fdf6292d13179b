//! User-registered log hooks
//!
//! One optional callback per level receives `(subsystem, message)`, and a
//! catch-all hook receives every accepted message. Slots are swapped
//! lock-free: the last registration wins, and a call already in flight may
//! still run the hook it loaded before a replacement.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::level::Level;

/// Hook for one level, called with `(subsystem, message)`
pub type LevelHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Hook for every message
pub type MessageHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Registry of hook slots
pub struct Hooks {
    message: ArcSwapOption<MessageHook>,
    levels: [ArcSwapOption<LevelHook>; Level::ALL.len()],
}

impl Hooks {
    /// Create a registry with every slot empty
    pub fn new() -> Self {
        Self {
            message: ArcSwapOption::empty(),
            levels: std::array::from_fn(|_| ArcSwapOption::empty()),
        }
    }

    fn slot(&self, level: Level) -> &ArcSwapOption<LevelHook> {
        &self.levels[level as usize]
    }

    /// Register (or with `None`, remove) the hook for `level`
    pub fn set(&self, level: Level, hook: Option<LevelHook>) {
        self.slot(level).store(hook.map(Arc::new));
    }

    /// Register (or with `None`, remove) the catch-all message hook
    pub fn set_message_hook(&self, hook: Option<MessageHook>) {
        self.message.store(hook.map(Arc::new));
    }

    /// Check if a hook is registered for `level`
    pub fn is_set(&self, level: Level) -> bool {
        self.slot(level).load().is_some()
    }

    /// Call the message hook, if any
    pub fn call_message(&self, message: &str) {
        if let Some(hook) = self.message.load_full() {
            hook(message);
        }
    }

    /// Call the hook for `level`, if any
    pub fn call(&self, level: Level, subsystem: &str, message: &str) {
        if let Some(hook) = self.slot(level).load_full() {
            hook(subsystem, message);
        }
    }

    /// Remove every hook
    pub fn clear(&self) {
        self.message.store(None);
        for slot in &self.levels {
            slot.store(None);
        }
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<Level> = Level::ALL.into_iter().filter(|l| self.is_set(*l)).collect();
        f.debug_struct("Hooks")
            .field("message", &self.message.load().is_some())
            .field("levels", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_level_hook_receives_subsystem_and_message() {
        let hooks = Hooks::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        hooks.set(
            Level::Warning,
            Some(Arc::new(move |subsystem: &str, message: &str| {
                sink.lock()
                    .unwrap()
                    .push(format!("{}|{}", subsystem, message));
            })),
        );

        hooks.call(Level::Warning, "Net", "slow");
        hooks.call(Level::Error, "Net", "ignored");

        assert_eq!(seen.lock().unwrap().as_slice(), ["Net|slow"]);
    }

    #[test]
    fn test_each_level_has_its_own_slot() {
        let hooks = Hooks::new();
        hooks.set(Level::Fault, Some(Arc::new(|_: &str, _: &str| {})));

        assert!(hooks.is_set(Level::Fault));
        assert!(!hooks.is_set(Level::Critical));
    }

    #[test]
    fn test_none_removes_hook() {
        let hooks = Hooks::new();
        hooks.set(Level::Info, Some(Arc::new(|_: &str, _: &str| {})));
        hooks.set(Level::Info, None);
        assert!(!hooks.is_set(Level::Info));

        hooks.set_message_hook(Some(Arc::new(|_: &str| panic!("removed hook called"))));
        hooks.set_message_hook(None);
        hooks.call_message("nothing happens");
    }

    #[test]
    fn test_concurrent_registration_and_calls() {
        let hooks = Arc::new(Hooks::new());
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let hooks = Arc::clone(&hooks);
                thread::spawn(move || {
                    for i in 0..200 {
                        if i % 2 == 0 {
                            hooks.set_message_hook(Some(Arc::new(|_: &str| {})));
                        } else {
                            hooks.set_message_hook(None);
                        }
                    }
                })
            })
            .collect();
        let callers: Vec<_> = (0..4)
            .map(|_| {
                let hooks = Arc::clone(&hooks);
                thread::spawn(move || {
                    for _ in 0..200 {
                        hooks.call_message("ping");
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(callers) {
            handle.join().unwrap();
        }
    }
}
