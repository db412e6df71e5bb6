//! Legacy metadata resolution.
//!
//! Older plugins ship a manifest without key, name or description. For those
//! the entry point itself knows the answers, so it is loaded from a scratch
//! copy of the archive and queried directly.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use plugin_fs::ScratchCopy;

use crate::error::{Error, LoadError, Result};
use crate::key;
use crate::metadata::PluginMetadata;

/// A plugin's main implementation, as far as metadata is concerned.
pub trait PluginEntryPoint {
    fn key(&self) -> String;
    fn name(&self) -> String;
    fn description(&self) -> String;
}

/// Produces entry points by identifier.
///
/// `archive` is the scratch copy the entry point is loaded from, never the
/// caller's original file.
pub trait EntryPointLoader: Send + Sync {
    fn load(
        &self,
        identifier: &str,
        archive: &Path,
    ) -> std::result::Result<Box<dyn PluginEntryPoint>, LoadError>;
}

type Factory =
    Box<dyn Fn(&Path) -> std::result::Result<Box<dyn PluginEntryPoint>, LoadError> + Send + Sync>;

/// Explicit table of entry-point factories keyed by identifier.
///
/// Each load calls the factory again, so every resolution gets a fresh
/// instance.
#[derive(Default)]
pub struct EntryPointRegistry {
    factories: HashMap<String, Factory>,
}

impl EntryPointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `identifier`, replacing any previous one.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn(&Path) -> std::result::Result<Box<dyn PluginEntryPoint>, LoadError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(factory));
    }

    /// Register an entry point type built with `Default`.
    pub fn register_default<T>(&mut self, identifier: impl Into<String>)
    where
        T: PluginEntryPoint + Default + 'static,
    {
        self.register(identifier, |_: &Path| {
            Ok(Box::new(T::default()) as Box<dyn PluginEntryPoint>)
        });
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered identifiers (sorted).
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.factories.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }
}

impl fmt::Debug for EntryPointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPointRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

impl EntryPointLoader for EntryPointRegistry {
    fn load(
        &self,
        identifier: &str,
        archive: &Path,
    ) -> std::result::Result<Box<dyn PluginEntryPoint>, LoadError> {
        let factory = self
            .factories
            .get(identifier)
            .ok_or_else(|| LoadError::UnknownEntryPoint(identifier.to_string()))?;
        factory(archive)
    }
}

/// Identity fields reported by an entry point. The key is already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyOverlay {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// Queries entry points of legacy plugins through an [`EntryPointLoader`].
#[derive(Clone)]
pub struct LegacyResolver {
    loader: Arc<dyn EntryPointLoader>,
    scratch_dir: Option<PathBuf>,
}

impl LegacyResolver {
    pub fn new(loader: Arc<dyn EntryPointLoader>) -> Self {
        Self {
            loader,
            scratch_dir: None,
        }
    }

    /// Place scratch copies in `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Load the entry point named by `metadata` from a scratch copy of its
    /// archive and read key, name and description from it.
    ///
    /// The scratch copy is gone when this returns, whatever the outcome.
    pub fn resolve(&self, metadata: &PluginMetadata) -> Result<LegacyOverlay> {
        let archive = metadata.source_file();
        let main_class = metadata.main_class();

        self.query(archive, main_class)
            .map_err(|source| Error::LegacyResolution {
                path: archive.to_path_buf(),
                main_class: main_class.to_string(),
                source,
            })
    }

    fn query(
        &self,
        archive: &Path,
        main_class: &str,
    ) -> std::result::Result<LegacyOverlay, LoadError> {
        if main_class.is_empty() {
            return Err(LoadError::MissingIdentifier);
        }

        let scratch = ScratchCopy::create(archive, self.scratch_dir.as_deref())?;
        tracing::debug!(
            archive = %archive.display(),
            main_class,
            "Loading legacy entry point"
        );

        let overlay = {
            let entry_point = self.loader.load(main_class, scratch.path())?;
            let raw_key = entry_point.key();
            let key = key::sanitize(&raw_key);
            if key.is_empty() {
                return Err(LoadError::InvalidKey(raw_key));
            }
            LegacyOverlay {
                key,
                name: entry_point.name(),
                description: entry_point.description(),
            }
        };

        let location = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!(scratch = %location.display(), error = %e, "Failed to remove scratch copy");
        }

        Ok(overlay)
    }
}

impl fmt::Debug for LegacyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyResolver")
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}
