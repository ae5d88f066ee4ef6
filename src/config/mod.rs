//! Declarative layer/filter configuration and the stores it is loaded from.

/// Configuration document model and editing helpers.
pub mod model;
/// Modification-marker aware configuration stores.
pub mod store;

pub use model::{Configuration, FilterSpec, LayerKind, LayerSpec};
pub use store::{ConfigMarker, ConfigStore, FileConfigStore, MemoryConfigStore};
