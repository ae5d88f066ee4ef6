use crate::filters::registry::FilterRegistry;
use crate::filters::schema::{FilterParams, FilterSchema, PropertyDescriptor};
use crate::filters::{Filter, FilterType};
use crate::foundation::error::LayercamResult;
use crate::render::frame::Frame;

/// Cyclic translation that advances by a fixed speed every frame.
///
/// All four channels move; pixels leaving one edge re-enter at the opposite edge.
#[derive(Debug)]
pub struct Roll {
    speed_x: i64,
    speed_y: i64,
    position_x: i64,
    position_y: i64,
    scratch: Vec<u8>,
}

impl Roll {
    /// New roll at position `(0, 0)`.
    pub fn new(speed_x: i64, speed_y: i64) -> Self {
        Self {
            speed_x,
            speed_y,
            position_x: 0,
            position_y: 0,
            scratch: Vec::new(),
        }
    }

    /// Current accumulated offset, always within the last frame's bounds.
    pub fn position(&self) -> (u32, u32) {
        (self.position_x as u32, self.position_y as u32)
    }
}

impl Filter for Roll {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&mut self, frame: &mut Frame) {
        let (w, h) = (frame.width(), frame.height());
        let (w64, h64) = (i64::from(w), i64::from(h));
        self.position_x = (self.position_x + self.speed_x.rem_euclid(w64)) % w64;
        self.position_y = (self.position_y + self.speed_y.rem_euclid(h64)) % h64;
        if self.position_x == 0 && self.position_y == 0 {
            return;
        }

        let shift_bytes = (self.position_x as usize) * 4;
        let shift_rows = self.position_y as u32;
        self.scratch.clear();
        self.scratch.extend_from_slice(frame.data());
        let stride = frame.stride();
        for y in 0..h {
            let src = &self.scratch[(y as usize) * stride..(y as usize + 1) * stride];
            let dst = frame.row_mut((y + shift_rows) % h);
            dst.copy_from_slice(src);
            dst.rotate_right(shift_bytes);
        }
    }
}

impl FilterType for Roll {
    const NAME: &'static str = "roll";

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            PropertyDescriptor::numeric("Horizontal Speed", -200, 200).with_default(0),
            PropertyDescriptor::numeric("Vertical Speed", -200, 200).with_default(0),
        ])
    }

    fn from_params(params: &FilterParams<'_>) -> LayercamResult<Self> {
        Ok(Self::new(params.int(0)?, params.int(1)?))
    }
}

/// Register [`Roll`] as `roll`.
pub fn register(registry: &mut FilterRegistry) -> LayercamResult<()> {
    registry.register_type::<Roll>()
}

#[cfg(test)]
#[path = "../../tests/unit/filters/roll.rs"]
mod tests;
