/// Frame geometry, timing and indexing primitives.
pub mod core;
/// Crate error taxonomy.
pub mod error;
pub(crate) mod math;
