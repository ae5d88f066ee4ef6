use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::LayercamResult;
use crate::render::frame::Frame;

/// Producer of frames, one per call, owned by the main loop.
///
/// Errors are device errors and are surfaced unchanged; sources retry internally if they want to.
pub trait FrameSource: Send {
    /// Next frame. May block until one is available.
    fn next_frame(&mut self) -> LayercamResult<Frame>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> LayercamResult<Frame> {
        (**self).next_frame()
    }
}

/// Repeats one decoded image forever.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    frame: Frame,
}

impl StillImageSource {
    /// Decode an image file into straight-alpha RGBA8.
    pub fn open(path: &Path) -> LayercamResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode image '{}'", path.display()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Ok(Self {
            frame: Frame::from_rgba8(w, h, img.into_raw())?,
        })
    }

    /// Decode an image file and resample it to `canvas`.
    pub fn open_resized(path: &Path, canvas: Canvas) -> LayercamResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("decode image '{}'", path.display()))?
            .to_rgba8();
        let img = if img.dimensions() == (canvas.width, canvas.height) {
            img
        } else {
            image::imageops::resize(
                &img,
                canvas.width,
                canvas.height,
                image::imageops::FilterType::Triangle,
            )
        };
        Ok(Self {
            frame: Frame::from_rgba8(canvas.width, canvas.height, img.into_raw())?,
        })
    }

    /// Wrap an already decoded frame.
    pub fn from_frame(frame: Frame) -> Self {
        Self { frame }
    }

    /// Dimensions of the repeated frame.
    pub fn canvas(&self) -> Canvas {
        self.frame.canvas()
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> LayercamResult<Frame> {
        Ok(self.frame.clone())
    }
}

/// Single-color frames.
#[derive(Clone, Copy, Debug)]
pub struct SolidColorSource {
    canvas: Canvas,
    rgba: [u8; 4],
}

impl SolidColorSource {
    /// Frames of `canvas` filled with `rgba`.
    pub fn new(canvas: Canvas, rgba: [u8; 4]) -> Self {
        Self { canvas, rgba }
    }
}

impl FrameSource for SolidColorSource {
    fn next_frame(&mut self) -> LayercamResult<Frame> {
        Ok(Frame::solid(self.canvas, self.rgba))
    }
}

/// Opaque diagonal gradient that drifts one pixel per frame. Stands in for a camera.
#[derive(Clone, Debug)]
pub struct TestPatternSource {
    canvas: Canvas,
    tick: u32,
}

impl TestPatternSource {
    /// Pattern source of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, tick: 0 }
    }
}

impl FrameSource for TestPatternSource {
    fn next_frame(&mut self) -> LayercamResult<Frame> {
        let Canvas { width, height } = self.canvas;
        let mut frame = Frame::transparent(self.canvas);
        for y in 0..height {
            for x in 0..width {
                let d = x.wrapping_add(y).wrapping_add(self.tick);
                frame.set_pixel(
                    x,
                    y,
                    [
                        (x * 255 / width.max(1)) as u8,
                        (y * 255 / height.max(1)) as u8,
                        (d % 256) as u8,
                        255,
                    ],
                );
            }
        }
        self.tick = self.tick.wrapping_add(1);
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/source.rs"]
mod tests;
