use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::render::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Nominal output frame rate.
    pub fps: Fps,
}

/// Consumer of composited frames.
///
/// Ordering contract: `begin` once, then `push_frame` with strictly increasing indices, then
/// `end` once to flush and release the device.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LayercamResult<()>;
    /// Write one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> LayercamResult<()>;
    /// Flush and release resources.
    fn end(&mut self) -> LayercamResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, cfg: SinkConfig) -> LayercamResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> LayercamResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> LayercamResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercamResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> LayercamResult<()> {
        if self.cfg.is_none() {
            return Err(LayercamError::device("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(LayercamError::device("sink received out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LayercamResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> LayercamResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &Frame) -> LayercamResult<()> {
        Ok(())
    }

    fn end(&mut self) -> LayercamResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/sink.rs"]
mod tests;
