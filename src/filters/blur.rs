use crate::filters::registry::FilterRegistry;
use crate::filters::schema::{FilterParams, FilterSchema, PropertyDescriptor};
use crate::filters::{Filter, FilterType};
use crate::foundation::error::LayercamResult;
use crate::render::frame::Frame;

/// Separable box blur over the color channels.
///
/// Each output channel is the rounded mean of a `(2 * intensity_x + 1) x (2 * intensity_y + 1)`
/// window, with edge pixels replicated. Alpha passes through untouched.
#[derive(Debug)]
pub struct Blur {
    intensity_x: u32,
    intensity_y: u32,
    scratch: Vec<u8>,
}

impl Blur {
    /// A non-positive `intensity_y` follows `intensity_x`.
    pub fn new(intensity_x: i64, intensity_y: i64) -> Self {
        let intensity_y = if intensity_y > 0 {
            intensity_y
        } else {
            intensity_x
        };
        Self {
            intensity_x: to_radius(intensity_x),
            intensity_y: to_radius(intensity_y),
            scratch: Vec::new(),
        }
    }

    /// Horizontal and vertical radius in pixels.
    pub fn radii(&self) -> (u32, u32) {
        (self.intensity_x, self.intensity_y)
    }
}

fn to_radius(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

impl Filter for Blur {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&mut self, frame: &mut Frame) {
        if self.intensity_x == 0 && self.intensity_y == 0 {
            return;
        }
        let (w, h) = (frame.width(), frame.height());
        if self.intensity_x > 0 {
            self.scratch.clear();
            self.scratch.extend_from_slice(frame.data());
            horizontal_pass(&self.scratch, frame.data_mut(), w, h, self.intensity_x);
        }
        if self.intensity_y > 0 {
            self.scratch.clear();
            self.scratch.extend_from_slice(frame.data());
            vertical_pass(&self.scratch, frame.data_mut(), w, h, self.intensity_y);
        }
    }
}

impl FilterType for Blur {
    const NAME: &'static str = "blur";

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            PropertyDescriptor::numeric("intensity_x", 0, 100).with_default(5),
            PropertyDescriptor::numeric("intensity_y", 0, 100).with_default(5),
        ])
    }

    fn from_params(params: &FilterParams<'_>) -> LayercamResult<Self> {
        Ok(Self::new(params.int(0)?, params.int(1)?))
    }
}

/// Register [`Blur`] as `blur`.
pub fn register(registry: &mut FilterRegistry) -> LayercamResult<()> {
    registry.register_type::<Blur>()
}

// Sliding-window mean along one axis. `at(i)` maps a clamped position to a byte offset.
// Past the line length every window is already the whole line, so the radius is capped there.
fn blur_line(src: &[u8], dst: &mut [u8], len: u32, radius: u32, at: impl Fn(u32) -> usize) {
    let radius = radius.min(len);
    let n = u64::from(radius) * 2 + 1;
    let last = i64::from(len) - 1;
    let clamp = |i: i64| i.clamp(0, last) as u32;

    let mut acc = [0u64; 3];
    for k in -i64::from(radius)..=i64::from(radius) {
        let idx = at(clamp(k));
        for c in 0..3 {
            acc[c] += u64::from(src[idx + c]);
        }
    }

    for i in 0..len {
        let out = at(i);
        for c in 0..3 {
            dst[out + c] = ((acc[c] + n / 2) / n).min(255) as u8;
        }
        let add = at(clamp(i64::from(i) + i64::from(radius) + 1));
        let sub = at(clamp(i64::from(i) - i64::from(radius)));
        for c in 0..3 {
            acc[c] = acc[c] + u64::from(src[add + c]) - u64::from(src[sub + c]);
        }
    }
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let stride = (width as usize) * 4;
    for y in 0..height as usize {
        let row = y * stride;
        blur_line(src, dst, width, radius, |x| row + (x as usize) * 4);
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let stride = (width as usize) * 4;
    for x in 0..width as usize {
        let col = x * 4;
        blur_line(src, dst, height, radius, |y| (y as usize) * stride + col);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/blur.rs"]
mod tests;
