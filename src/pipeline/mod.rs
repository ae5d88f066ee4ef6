//! Layers, the compositor, and atomically published pipeline generations.

/// Pipeline generations and the handle they are published through.
pub mod generation;
/// Source selection plus an owned filter chain.
pub mod layer;
/// One generation's layers and compositing logic.
pub mod compositor;

pub use compositor::{ComposeInputs, Pipeline};
pub use generation::{Generation, GenerationHandle, GenerationId};
pub use layer::{Layer, LayerContext};
