//! Stateful per-frame filters and the registry that builds them from positional specs.
//!
//! A filter type pairs a declarative [`FilterSchema`] with a typed constructor
//! ([`FilterType::from_params`]). Instances own their temporal state (offsets, phases, scratch
//! buffers) and are only ever driven by the layer that built them.

use crate::foundation::error::LayercamResult;
use crate::render::frame::Frame;

/// Box-average smoothing.
pub mod blur;
/// Name to schema/constructor mapping.
pub mod registry;
/// Cyclic frame translation.
pub mod roll;
/// Parameter schemas and typed parameter access.
pub mod schema;
/// Scrolling horizontal scanline bands.
pub mod stripes;

pub use blur::Blur;
pub use registry::{FilterFactory, FilterRegistry};
pub use roll::Roll;
pub use schema::{FilterParams, FilterSchema, PropertyDescriptor, PropertyKind};
pub use stripes::Stripes;

/// A live filter instance.
///
/// `apply` is called exactly once per produced frame while the owning pipeline generation is
/// active. Implementations must keep the frame's dimensions and must leave the alpha channel
/// untouched unless they document otherwise.
pub trait Filter: Send + std::fmt::Debug {
    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Transform `frame` in place, advancing internal state by one step.
    fn apply(&mut self, frame: &mut Frame);
}

/// A filter type with a static schema and a typed constructor.
pub trait FilterType: Filter + Sized + 'static {
    /// Registry key.
    const NAME: &'static str;

    /// Positional parameter schema.
    fn schema() -> FilterSchema;

    /// Construct from parameters already resolved against [`FilterType::schema`].
    fn from_params(params: &FilterParams<'_>) -> LayercamResult<Self>;
}
