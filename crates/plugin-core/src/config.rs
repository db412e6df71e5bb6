//! Deployer configuration.

use std::path::{Path, PathBuf};

use plugin_fs::{ConfigStore, EntryPath};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_LIBRARY_PREFIX, DEFAULT_MANIFEST_ENTRY, Error, Result};

/// Settings shared by the extractor, the legacy resolver and the installer.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// manifest_entry = "META-INF/MANIFEST.MF"
/// library_prefix = "META-INF/lib"
/// scratch_dir = "/var/tmp/plugins"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployerConfig {
    /// In-archive location of the manifest.
    pub manifest_entry: String,
    /// In-archive directory holding bundled dependencies.
    pub library_prefix: String,
    /// Where scratch copies go. `None` means the system temp directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            manifest_entry: DEFAULT_MANIFEST_ENTRY.to_string(),
            library_prefix: DEFAULT_LIBRARY_PREFIX.to_string(),
            scratch_dir: None,
        }
    }
}

impl DeployerConfig {
    /// Load from a TOML, JSON or YAML file, chosen by extension, and
    /// [`validate`](Self::validate) it.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Both in-archive paths must name something below the archive root.
    pub fn validate(&self) -> Result<()> {
        if self.manifest_entry().is_empty() {
            return Err(Error::InvalidConfig {
                field: "manifest_entry",
                reason: "must name an archive entry".to_string(),
            });
        }
        if self.library_prefix().is_empty() {
            return Err(Error::InvalidConfig {
                field: "library_prefix",
                reason: "must name a directory below the archive root".to_string(),
            });
        }
        Ok(())
    }

    pub fn manifest_entry(&self) -> EntryPath {
        EntryPath::new(&self.manifest_entry)
    }

    pub fn library_prefix(&self) -> EntryPath {
        EntryPath::new(&self.library_prefix)
    }
}
