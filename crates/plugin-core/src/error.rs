//! Error types for plugin-core

use std::path::PathBuf;

/// Result type for plugin-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by extraction and installation.
///
/// Every variant is terminal for the operation that produced it; nothing is
/// retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive could not be opened or read.
    #[error("failed to extract plugin metadata from file {path}: {source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: plugin_fs::Error,
    },

    /// The archive is readable but carries no manifest entry.
    #[error("failed to extract plugin metadata from file {path}: missing manifest {entry}")]
    ManifestMissing { path: PathBuf, entry: String },

    /// The manifest entry is not valid manifest syntax.
    #[error("failed to extract plugin metadata from file {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: crate::manifest::ParseError,
    },

    /// The entry point of a legacy plugin could not be loaded or queried.
    #[error("the metadata main class can not be created. plugin file={path}, class={main_class}: {source}")]
    LegacyResolution {
        path: PathBuf,
        main_class: String,
        #[source]
        source: LoadError,
    },

    /// Installation aborted. Files copied before the failure stay in place.
    #[error("failed to install plugin {plugin}: {source}")]
    Install {
        plugin: String,
        #[source]
        source: InstallFailure,
    },

    #[error("invalid deployer configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Filesystem error from plugin-fs outside of extraction and installation
    #[error(transparent)]
    Fs(#[from] plugin_fs::Error),
}

/// Why an installation was aborted.
#[derive(Debug, thiserror::Error)]
pub enum InstallFailure {
    #[error(transparent)]
    Fs(#[from] plugin_fs::Error),

    #[error("dependency {dependency} can not be found in {archive}")]
    MissingDependency { dependency: String, archive: PathBuf },

    #[error("invalid plugin key '{key}'")]
    InvalidKey { key: String },

    #[error("already installed ({deployed} deployed files recorded)")]
    AlreadyInstalled { deployed: usize },

    #[error("{path} has no parent directory to install into")]
    NoParentDirectory { path: PathBuf },

    #[error("library prefix is empty, refusing to unpack the whole archive")]
    EmptyLibraryPrefix,
}

/// Why an entry point could not be loaded or queried.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no entry point declared")]
    MissingIdentifier,

    #[error("unknown entry point {0}")]
    UnknownEntryPoint(String),

    #[error("failed to prepare scratch copy: {0}")]
    Scratch(#[from] plugin_fs::Error),

    #[error("entry point construction failed: {0}")]
    Construction(String),

    #[error("entry point reported an unusable key '{0}'")]
    InvalidKey(String),
}
