use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::Context as _;
use parking_lot::Mutex;

use crate::config::model::Configuration;
use crate::foundation::error::{LayercamError, LayercamResult};

/// Opaque, comparable configuration version (file mtime, edit counter, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigMarker(pub u128);

/// Source of configuration documents.
///
/// The watcher compares [`ConfigStore::current_modification_marker`] against the marker of the
/// active generation and calls [`ConfigStore::load_configuration`] only when it changed.
pub trait ConfigStore: Send + Sync {
    /// Cheap version check.
    fn current_modification_marker(&self) -> LayercamResult<ConfigMarker>;
    /// Read and parse the current configuration.
    fn load_configuration(&self) -> LayercamResult<Configuration>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn current_modification_marker(&self) -> LayercamResult<ConfigMarker> {
        (**self).current_modification_marker()
    }

    fn load_configuration(&self) -> LayercamResult<Configuration> {
        (**self).load_configuration()
    }
}

/// JSON file on disk, versioned by modification time.
#[derive(Clone, Debug)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store backed by the JSON document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `config` as pretty JSON, replacing the file contents.
    pub fn save(&self, config: &Configuration) -> LayercamResult<()> {
        let json = config.to_json_pretty()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config dir '{}'", parent.display()))?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("write config '{}'", self.path.display()))?;
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn current_modification_marker(&self) -> LayercamResult<ConfigMarker> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .with_context(|| format!("stat config '{}'", self.path.display()))?;
        let nanos = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Ok(ConfigMarker(nanos))
    }

    fn load_configuration(&self) -> LayercamResult<Configuration> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read config '{}'", self.path.display()))?;
        Configuration::from_json_str(&text).map_err(|e| {
            LayercamError::config(format!("parse config '{}': {e}", self.path.display()))
        })
    }
}

/// In-process store; every [`MemoryConfigStore::replace`] bumps the version.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    inner: Mutex<(Configuration, u128)>,
}

impl MemoryConfigStore {
    /// Store holding `config` at version 0.
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Mutex::new((config, 0)),
        }
    }

    /// Replace the configuration and bump the version.
    pub fn replace(&self, config: Configuration) {
        let mut guard = self.inner.lock();
        guard.0 = config;
        guard.1 += 1;
    }

    /// Edit the configuration in place and bump the version.
    pub fn update<R>(&self, edit: impl FnOnce(&mut Configuration) -> R) -> R {
        let mut guard = self.inner.lock();
        let out = edit(&mut guard.0);
        guard.1 += 1;
        out
    }

    /// Snapshot of the current configuration.
    pub fn snapshot(&self) -> Configuration {
        self.inner.lock().0.clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn current_modification_marker(&self) -> LayercamResult<ConfigMarker> {
        Ok(ConfigMarker(self.inner.lock().1))
    }

    fn load_configuration(&self) -> LayercamResult<Configuration> {
        Ok(self.snapshot())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/store.rs"]
mod tests;
