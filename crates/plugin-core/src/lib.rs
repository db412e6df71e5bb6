//! Plugin metadata extraction and installation for Plugin Deployer.
//!
//! Given a plugin archive, this crate reads its manifest into a
//! [`PluginMetadata`] value, falls back to querying the plugin's entry point
//! when the manifest predates the current conventions, and installs the
//! archive together with its bundled libraries and legacy extension files.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use plugin_core::{DeployerConfig, EntryPointRegistry, PluginDeployer};
//!
//! let deployer = PluginDeployer::new(DeployerConfig::default(), Arc::new(EntryPointRegistry::new()));
//! let metadata = deployer
//!     .install_file(Path::new("downloads/checkstyle.jar"), false, Path::new("plugins/checkstyle"))
//!     .unwrap();
//! for file in metadata.deployed_files() {
//!     println!("{}", file.display());
//! }
//! ```

pub mod config;
pub mod deployer;
pub mod error;
pub mod extractor;
pub mod installer;
pub mod key;
pub mod legacy;
pub mod logging;
pub mod manifest;
pub mod metadata;

/// Location of the manifest inside a plugin archive.
pub const DEFAULT_MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Archive directory whose entries are unpacked as bundled dependencies.
pub const DEFAULT_LIBRARY_PREFIX: &str = "META-INF/lib";

pub use config::DeployerConfig;
pub use deployer::PluginDeployer;
pub use error::{Error, InstallFailure, LoadError, Result};
pub use extractor::MetadataExtractor;
pub use installer::PluginInstaller;
pub use legacy::{
    EntryPointLoader, EntryPointRegistry, LegacyOverlay, LegacyResolver, PluginEntryPoint,
};
pub use manifest::PluginManifest;
pub use metadata::PluginMetadata;
