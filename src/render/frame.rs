use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercamError, LayercamResult};

/// Index of the alpha channel within one RGBA8 pixel.
pub const ALPHA: usize = 3;

/// A rectangular RGBA8 pixel grid.
///
/// Pixels are tightly packed, row-major, **straight** (non-premultiplied) alpha. Color filters
/// operate on channels `0..3`; channel [`ALPHA`] is transparency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap an existing RGBA8 buffer, validating its length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> LayercamResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let expected = canvas.rgba8_len()?;
        if data.len() != expected {
            return Err(LayercamError::invalid_param(format!(
                "rgba8 buffer for {canvas} must be {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent black frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self::solid(canvas, [0, 0, 0, 0])
    }

    /// Frame filled with one RGBA8 value.
    pub fn solid(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let px = (canvas.width as usize) * (canvas.height as usize);
        Self {
            width: canvas.width,
            height: canvas.height,
            data: rgba.repeat(px),
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes. The length is fixed.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the frame and return its buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        (self.width as usize) * 4
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = (y as usize) * stride;
        &self.data[start..start + stride]
    }

    /// One mutable row of pixels.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = (y as usize) * stride;
        &mut self.data[start..start + stride]
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Overwrite one pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Fail with [`LayercamError::ShapeMismatch`] unless this frame is `expected` sized.
    pub fn ensure_canvas(&self, expected: Canvas) -> LayercamResult<()> {
        let actual = self.canvas();
        if actual != expected {
            return Err(LayercamError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
