use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::store::{ConfigMarker, ConfigStore};
use crate::filters::registry::FilterRegistry;
use crate::foundation::error::{LayercamError, LayercamResult};
use crate::pipeline::compositor::Pipeline;
use crate::pipeline::generation::{Generation, GenerationHandle};
use crate::session::control::LoopControl;

/// Background polling options.
#[derive(Clone, Copy, Debug)]
pub struct WatcherOpts {
    /// Delay between marker checks.
    pub interval: Duration,
}

impl Default for WatcherOpts {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
        }
    }
}

/// Result of one [`ConfigWatcher::poll`].
#[derive(Debug)]
pub enum ReloadOutcome {
    /// Marker unchanged, or unchanged since a failed build.
    Unchanged,
    /// A new generation was built and published.
    Reloaded {
        /// The generation now active.
        generation: Arc<Generation>,
    },
}

impl ReloadOutcome {
    /// Return `true` for [`ReloadOutcome::Reloaded`].
    pub fn is_reloaded(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

/// Rebuilds and publishes pipeline generations when the configuration store changes.
pub struct ConfigWatcher<S: ConfigStore> {
    store: S,
    registry: Arc<FilterRegistry>,
    handle: Arc<GenerationHandle>,
    applied: Option<ConfigMarker>,
    failed: Option<ConfigMarker>,
    parallel_layers: bool,
    foreground_available: bool,
}

impl<S: ConfigStore> std::fmt::Debug for ConfigWatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("applied", &self.applied)
            .field("failed", &self.failed)
            .field("parallel_layers", &self.parallel_layers)
            .field("foreground_available", &self.foreground_available)
            .finish_non_exhaustive()
    }
}

impl<S: ConfigStore> ConfigWatcher<S> {
    /// Load the current configuration and publish it as the first generation.
    ///
    /// Unlike later reloads there is no previous generation to fall back to, so failures here
    /// are returned as-is.
    pub fn bootstrap(
        store: S,
        registry: Arc<FilterRegistry>,
        parallel_layers: bool,
    ) -> LayercamResult<Self> {
        let marker = store.current_modification_marker()?;
        let config = store.load_configuration()?;
        let pipeline = Pipeline::build(&config, &registry, Some(marker))?
            .with_parallel_layers(parallel_layers);
        Ok(Self {
            store,
            registry,
            handle: Arc::new(GenerationHandle::new(pipeline)),
            applied: Some(marker),
            failed: None,
            parallel_layers,
            foreground_available: true,
        })
    }

    /// Watch `store` and publish into an existing handle. The first poll always rebuilds.
    pub fn attach(
        store: S,
        registry: Arc<FilterRegistry>,
        handle: Arc<GenerationHandle>,
        parallel_layers: bool,
    ) -> Self {
        Self {
            store,
            registry,
            handle,
            applied: None,
            failed: None,
            parallel_layers,
            foreground_available: true,
        }
    }

    /// Declare whether the consuming loop has a foreground source.
    ///
    /// Without one, reloads that add a foreground layer are rejected and the active generation
    /// keeps serving.
    pub fn with_foreground_available(mut self, available: bool) -> Self {
        self.foreground_available = available;
        self
    }

    /// Shared slot the main loop reads from.
    pub fn handle(&self) -> Arc<GenerationHandle> {
        Arc::clone(&self.handle)
    }

    /// Registry used for rebuilds.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Marker of the last successfully published configuration.
    pub fn applied_marker(&self) -> Option<ConfigMarker> {
        self.applied
    }

    /// Rebuild when the store marker differs from the applied one.
    ///
    /// A marker whose build already failed is not retried until the store changes again.
    pub fn poll(&mut self) -> LayercamResult<ReloadOutcome> {
        let marker = self.store.current_modification_marker()?;
        if Some(marker) == self.applied || Some(marker) == self.failed {
            return Ok(ReloadOutcome::Unchanged);
        }
        self.reload(marker)
    }

    /// Rebuild from the store regardless of its marker.
    pub fn force_reload(&mut self) -> LayercamResult<ReloadOutcome> {
        let marker = self.store.current_modification_marker()?;
        self.reload(marker)
    }

    fn reload(&mut self, marker: ConfigMarker) -> LayercamResult<ReloadOutcome> {
        let built = self
            .store
            .load_configuration()
            .and_then(|config| Pipeline::build(&config, &self.registry, Some(marker)))
            .and_then(|pipeline| {
                if pipeline.needs_foreground() && !self.foreground_available {
                    return Err(LayercamError::config(
                        "configuration has a foreground layer but no foreground source is available",
                    ));
                }
                Ok(pipeline)
            });
        match built {
            Ok(pipeline) => {
                let generation = self
                    .handle
                    .publish(pipeline.with_parallel_layers(self.parallel_layers));
                self.applied = Some(marker);
                self.failed = None;
                Ok(ReloadOutcome::Reloaded { generation })
            }
            Err(err) => {
                self.failed = Some(marker);
                tracing::warn!(
                    error = %err,
                    active = %self.handle.load().id(),
                    "configuration rejected; keeping active generation"
                );
                Err(err)
            }
        }
    }
}

impl<S: ConfigStore + 'static> ConfigWatcher<S> {
    /// Poll on a background thread until `control` is stopped.
    pub fn spawn(mut self, opts: WatcherOpts, control: Arc<LoopControl>) -> JoinHandle<Self> {
        std::thread::spawn(move || {
            while !control.is_stopped() {
                match self.poll() {
                    Ok(ReloadOutcome::Reloaded { generation }) => {
                        tracing::debug!(generation = %generation.id(), "watcher reloaded");
                    }
                    Ok(ReloadOutcome::Unchanged) => {}
                    Err(err) => tracing::debug!(error = %err, "watcher poll failed"),
                }
                std::thread::sleep(opts.interval);
            }
            self
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/watcher.rs"]
mod tests;
