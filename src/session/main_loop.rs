use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::io::sink::{FrameSink, SinkConfig};
use crate::io::source::FrameSource;
use crate::pipeline::compositor::ComposeInputs;
use crate::pipeline::generation::GenerationHandle;
use crate::session::control::LoopControl;

/// What the loop does when a frame's sources disagree on dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Drop the frame cycle and retry on the next tick. Filter state is untouched.
    #[default]
    SkipFrame,
    /// Return the error from [`MainLoop::run`].
    Stop,
}

/// Main loop options.
#[derive(Clone, Copy, Debug)]
pub struct MainLoopOpts {
    /// Target rate; defines the soft per-frame budget and the sink's nominal rate.
    pub fps: Fps,
    /// Sleep out the remainder of the budget after fast frames.
    pub pace: bool,
    /// Sleep between checks while paused.
    pub pause_poll: Duration,
    /// Shape mismatch handling.
    pub on_shape_mismatch: MismatchPolicy,
    /// Stop after this many produced frames.
    pub max_frames: Option<u64>,
}

impl Default for MainLoopOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            pace: true,
            pause_poll: Duration::from_millis(20),
            on_shape_mismatch: MismatchPolicy::default(),
            max_frames: None,
        }
    }
}

/// Result of a single [`MainLoop::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frame was composed and written to the sink.
    Produced(FrameIndex),
    /// The loop is paused; nothing was pulled or produced.
    Paused,
    /// The frame cycle was aborted on a shape mismatch.
    Skipped,
}

/// Counters returned by [`MainLoop::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Frames written to the sink.
    pub frames_produced: u64,
    /// Frame cycles dropped on shape mismatch.
    pub frames_skipped: u64,
    /// Produced frames that took longer than the frame budget.
    pub over_budget: u64,
}

/// Pulls input frames, composes them with the active generation and writes the result.
pub struct MainLoop<S: FrameSink = Box<dyn FrameSink>> {
    input: Box<dyn FrameSource>,
    foreground: Option<Box<dyn FrameSource>>,
    sink: S,
    handle: Arc<GenerationHandle>,
    control: Arc<LoopControl>,
    opts: MainLoopOpts,
    next_idx: FrameIndex,
    started: bool,
}

impl<S: FrameSink> MainLoop<S> {
    /// Loop reading from `input` and publishing into `sink`.
    pub fn new(
        input: Box<dyn FrameSource>,
        sink: S,
        handle: Arc<GenerationHandle>,
        control: Arc<LoopControl>,
        opts: MainLoopOpts,
    ) -> Self {
        Self {
            input,
            foreground: None,
            sink,
            handle,
            control,
            opts,
            next_idx: FrameIndex(0),
            started: false,
        }
    }

    /// Source for `foreground` layers.
    pub fn with_foreground(mut self, foreground: Box<dyn FrameSource>) -> Self {
        self.foreground = Some(foreground);
        self
    }

    /// Shared control flags.
    pub fn control(&self) -> Arc<LoopControl> {
        Arc::clone(&self.control)
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the loop and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Index the next produced frame will carry.
    pub fn next_index(&self) -> FrameIndex {
        self.next_idx
    }

    /// Run one iteration.
    ///
    /// The active generation is read exactly once and used for the whole compose call.
    pub fn step(&mut self) -> LayercamResult<StepOutcome> {
        if self.control.is_paused() {
            std::thread::sleep(self.opts.pause_poll);
            return Ok(StepOutcome::Paused);
        }

        let input = self.input.next_frame()?;
        let generation = self.handle.load();
        let foreground = if generation.needs_foreground() {
            let source = self.foreground.as_mut().ok_or_else(|| {
                LayercamError::device("configuration has a foreground layer but no foreground source")
            })?;
            Some(source.next_frame()?)
        } else {
            None
        };

        let composed = generation.compose(&ComposeInputs {
            input: &input,
            foreground: foreground.as_ref(),
        });
        let frame = match composed {
            Ok(frame) => frame,
            Err(err) if err.is_shape_mismatch() => match self.opts.on_shape_mismatch {
                MismatchPolicy::SkipFrame => {
                    tracing::warn!(generation = %generation.id(), error = %err, "frame skipped");
                    return Ok(StepOutcome::Skipped);
                }
                MismatchPolicy::Stop => return Err(err),
            },
            Err(err) => return Err(err),
        };

        if !self.started {
            self.sink.begin(SinkConfig {
                canvas: frame.canvas(),
                fps: self.opts.fps,
            })?;
            self.started = true;
        }
        let idx = self.next_idx;
        self.sink.push_frame(idx, &frame)?;
        self.next_idx = idx.next();
        Ok(StepOutcome::Produced(idx))
    }

    /// Loop until stopped, `max_frames` is reached or an error surfaces. The sink is ended in
    /// every case once it has been started.
    pub fn run(&mut self) -> LayercamResult<LoopStats> {
        tracing::info!(
            fps = self.opts.fps.as_f64(),
            generation = %self.handle.load().id(),
            "main loop started"
        );
        let mut stats = LoopStats::default();
        let result = self.run_inner(&mut stats);
        let ended = self.finish();
        tracing::info!(
            produced = stats.frames_produced,
            skipped = stats.frames_skipped,
            over_budget = stats.over_budget,
            "main loop stopped"
        );
        result?;
        ended?;
        Ok(stats)
    }

    fn run_inner(&mut self, stats: &mut LoopStats) -> LayercamResult<()> {
        let budget = self.opts.fps.frame_budget();
        while !self.control.is_stopped() {
            if let Some(max) = self.opts.max_frames
                && stats.frames_produced >= max
            {
                break;
            }

            let t0 = Instant::now();
            match self.step()? {
                StepOutcome::Produced(idx) => {
                    stats.frames_produced += 1;
                    let elapsed = t0.elapsed();
                    tracing::debug!(frame = idx.0, elapsed_ms = elapsed.as_secs_f64() * 1000.0);
                    if elapsed > budget {
                        stats.over_budget += 1;
                        tracing::warn!(
                            frame = idx.0,
                            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                            budget_ms = budget.as_secs_f64() * 1000.0,
                            "frame over budget"
                        );
                    } else if self.opts.pace {
                        std::thread::sleep(budget - elapsed);
                    }
                }
                StepOutcome::Skipped => stats.frames_skipped += 1,
                StepOutcome::Paused => {}
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> LayercamResult<()> {
        if !self.started {
            return Ok(());
        }
        self.started = false;
        self.sink.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/main_loop.rs"]
mod tests;
