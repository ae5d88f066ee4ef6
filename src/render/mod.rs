/// Straight-alpha RGBA8 frame buffer.
pub mod frame;
