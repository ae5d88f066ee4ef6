use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative pause and stop flags shared between the loop, the watcher and whoever drives them.
///
/// Both flags are checked once per iteration; nothing is preempted.
#[derive(Debug, Default)]
pub struct LoopControl {
    paused: AtomicBool,
    stopped: AtomicBool,
}

impl LoopControl {
    /// Running, not paused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze frame production. Filter state is kept.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Continue producing frames from where the pause left off.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Flip the pause flag and return the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    /// Request shutdown. Irreversible.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Current pause state.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Return `true` once [`LoopControl::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
