use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::config::store::ConfigMarker;
use crate::foundation::error::LayercamResult;
use crate::pipeline::compositor::{ComposeInputs, Pipeline};
use crate::render::frame::Frame;

/// Sequence number of a published generation, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationId(pub u64);

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// A published pipeline.
///
/// The layer set never changes after publication; only the filters' own temporal state and the
/// previous-output buffer advance, and only under the compose lock.
#[derive(Debug)]
pub struct Generation {
    id: GenerationId,
    marker: Option<ConfigMarker>,
    needs_foreground: bool,
    pipeline: Mutex<Pipeline>,
}

impl Generation {
    /// Publication sequence number.
    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// Marker of the configuration this generation was built from.
    pub fn marker(&self) -> Option<ConfigMarker> {
        self.marker
    }

    /// Return `true` when a foreground frame must be supplied to [`Generation::compose`].
    pub fn needs_foreground(&self) -> bool {
        self.needs_foreground
    }

    /// Compose one frame with this generation's layers.
    pub fn compose(&self, inputs: &ComposeInputs<'_>) -> LayercamResult<Frame> {
        self.pipeline.lock().compose(inputs)
    }

    /// Run `f` against the locked pipeline.
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&Pipeline) -> R) -> R {
        f(&self.pipeline.lock())
    }
}

/// Single atomically replaceable slot holding the active [`Generation`].
///
/// Readers take an `Arc` snapshot once per frame; publishers swap in a new generation and never
/// touch the old one, so a frame in flight finishes on the generation it started with.
#[derive(Debug)]
pub struct GenerationHandle {
    current: RwLock<Arc<Generation>>,
    next_id: AtomicU64,
}

impl GenerationHandle {
    /// Handle whose first active generation is `initial`.
    pub fn new(initial: Pipeline) -> Self {
        let first = Arc::new(Self::wrap(GenerationId(1), initial));
        Self {
            current: RwLock::new(first),
            next_id: AtomicU64::new(2),
        }
    }

    fn wrap(id: GenerationId, pipeline: Pipeline) -> Generation {
        Generation {
            id,
            marker: pipeline.marker(),
            needs_foreground: pipeline.needs_foreground(),
            pipeline: Mutex::new(pipeline),
        }
    }

    /// Snapshot of the active generation.
    pub fn load(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read())
    }

    /// Make `pipeline` the active generation and return it.
    pub fn publish(&self, pipeline: Pipeline) -> Arc<Generation> {
        let id = GenerationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let layers = pipeline.layers().len();
        let next = Arc::new(Self::wrap(id, pipeline));
        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        tracing::info!(
            generation = %next.id,
            replaced = %previous.id,
            layers,
            "published pipeline generation"
        );
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generation.rs"]
mod tests;
