/// Alpha compositing primitives.
pub mod composite;
