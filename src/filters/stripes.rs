use crate::filters::registry::FilterRegistry;
use crate::filters::schema::{FilterParams, FilterSchema, PropertyDescriptor};
use crate::filters::{Filter, FilterType};
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::foundation::math::clamp_channel;
use crate::render::frame::Frame;

/// Alternating dark/bright horizontal bands that scroll vertically.
///
/// Rows are grouped into periods of `2 * width`. Within a period, rows at phase offsets
/// `[0, width)` past the current phase get darker by `intensity` and the remaining `width` rows
/// get brighter. Results saturate to `0..=255`; alpha is untouched.
#[derive(Debug)]
pub struct Stripes {
    width: i64,
    intensity: i32,
    speed: i64,
    roll_y: i64,
}

impl Stripes {
    /// `width` must be at least 1.
    pub fn new(width: i64, intensity: i64, speed: i64) -> LayercamResult<Self> {
        if width < 1 {
            return Err(LayercamError::invalid_param(format!(
                "stripes width must be >= 1, got {width}"
            )));
        }
        Ok(Self {
            width: width.min(i64::from(u32::MAX)),
            // Anything beyond a full channel swing saturates identically.
            intensity: intensity.clamp(-255, 255) as i32,
            speed,
            roll_y: 0,
        })
    }

    /// Current phase in `[0, 2 * width)`.
    pub fn phase(&self) -> i64 {
        self.roll_y
    }

    fn row_delta(&self, y: u32) -> i32 {
        let period = self.width * 2;
        let offset = (i64::from(y) - self.roll_y).rem_euclid(period);
        if offset < self.width {
            -self.intensity
        } else {
            self.intensity
        }
    }
}

impl Filter for Stripes {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&mut self, frame: &mut Frame) {
        let period = self.width * 2;
        self.roll_y = (self.roll_y + self.speed.rem_euclid(period)) % period;
        if self.intensity == 0 {
            return;
        }
        for y in 0..frame.height() {
            let delta = self.row_delta(y);
            for px in frame.row_mut(y).chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = clamp_channel(i32::from(*c) + delta);
                }
            }
        }
    }
}

impl FilterType for Stripes {
    const NAME: &'static str = "stripes";

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            PropertyDescriptor::numeric("Width", 1, 1024).with_default(2),
            PropertyDescriptor::numeric("Intensity", 0, 255).with_default(10),
            PropertyDescriptor::numeric("Speed", -200, 200).with_default(0),
        ])
    }

    fn from_params(params: &FilterParams<'_>) -> LayercamResult<Self> {
        Self::new(params.int(0)?, params.int(1)?, params.int(2)?)
    }
}

/// Register [`Stripes`] as `stripes`.
pub fn register(registry: &mut FilterRegistry) -> LayercamResult<()> {
    registry.register_type::<Stripes>()
}

#[cfg(test)]
#[path = "../../tests/unit/filters/stripes.rs"]
mod tests;
