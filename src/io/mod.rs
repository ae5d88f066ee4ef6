//! Frame source/sink boundary between the compositor and capture/output devices.

/// `ffmpeg`-backed capture source and virtual camera sink.
pub mod ffmpeg;
/// Sink contract and built-in sinks.
pub mod sink;
/// Source contract and built-in sources.
pub mod source;

pub use ffmpeg::{FfmpegCameraSink, FfmpegCameraSinkOpts, FfmpegCaptureOpts, FfmpegCaptureSource};
pub use sink::{FrameSink, InMemorySink, NullSink, SinkConfig};
pub use source::{FrameSource, SolidColorSource, StillImageSource, TestPatternSource};
