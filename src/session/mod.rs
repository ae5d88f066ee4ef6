//! Long-running orchestration: hot reload and the frame loop.

/// Pause and stop flags.
pub mod control;
/// Frame production loop.
pub mod main_loop;
/// Configuration hot reload.
pub mod watcher;

pub use control::LoopControl;
pub use main_loop::{LoopStats, MainLoop, MainLoopOpts, MismatchPolicy, StepOutcome};
pub use watcher::{ConfigWatcher, ReloadOutcome, WatcherOpts};
