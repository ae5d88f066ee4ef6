//! Layercam is a layered live-video compositor.
//!
//! A [`Configuration`] lists layers bottom to top. Each layer pulls a source frame (live input,
//! a foreground asset, the previous composited output, or nothing) and runs it through an
//! ordered chain of stateful [`Filter`]s. The [`Pipeline`] blends the layers with alpha "over"
//! into one output frame per tick.
//!
//! - Build a [`FilterRegistry`] once at startup
//! - Bootstrap a [`ConfigWatcher`] to publish the first pipeline generation
//! - Drive a [`MainLoop`] from a [`FrameSource`] into a [`FrameSink`]
//!
//! Configuration edits are picked up by the watcher and published as a fresh generation in one
//! atomic swap; every output frame is composed entirely by one generation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Straight-alpha blending.
pub mod effects;
/// Configuration documents and stores.
pub mod config;
/// Filter trait, schemas, registry and built-in filters.
pub mod filters;
/// Frame sources and sinks.
pub mod io;
/// Layers, compositor and generation publishing.
pub mod pipeline;
/// Frame buffers.
pub mod render;
/// Hot reload and the frame loop.
pub mod session;

pub use crate::config::{
    ConfigMarker, ConfigStore, Configuration, FileConfigStore, FilterSpec, LayerKind, LayerSpec,
    MemoryConfigStore,
};
pub use crate::filters::{
    Blur, Filter, FilterFactory, FilterParams, FilterRegistry, FilterSchema, FilterType,
    PropertyDescriptor, PropertyKind, Roll, Stripes,
};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{LayercamError, LayercamResult};
pub use crate::io::{
    FfmpegCameraSink, FfmpegCameraSinkOpts, FfmpegCaptureOpts, FfmpegCaptureSource, FrameSink,
    FrameSource, InMemorySink, NullSink, SinkConfig, SolidColorSource, StillImageSource,
    TestPatternSource,
};
pub use crate::pipeline::{
    ComposeInputs, Generation, GenerationHandle, GenerationId, Layer, LayerContext, Pipeline,
};
pub use crate::render::frame::Frame;
pub use crate::session::{
    ConfigWatcher, LoopControl, LoopStats, MainLoop, MainLoopOpts, MismatchPolicy, ReloadOutcome,
    StepOutcome, WatcherOpts,
};
