//! Extraction and installation in one call.

use std::path::Path;
use std::sync::Arc;

use crate::config::DeployerConfig;
use crate::error::Result;
use crate::extractor::MetadataExtractor;
use crate::installer::PluginInstaller;
use crate::legacy::{EntryPointLoader, LegacyResolver};
use crate::metadata::PluginMetadata;

/// Front door for callers: extracts metadata and installs plugins.
#[derive(Debug, Clone)]
pub struct PluginDeployer {
    extractor: MetadataExtractor,
    installer: PluginInstaller,
}

impl PluginDeployer {
    pub fn new(config: DeployerConfig, loader: Arc<dyn EntryPointLoader>) -> Self {
        let mut resolver = LegacyResolver::new(loader);
        if let Some(dir) = &config.scratch_dir {
            resolver = resolver.with_scratch_dir(dir.clone());
        }

        Self {
            extractor: MetadataExtractor::new(&config, resolver),
            installer: PluginInstaller::new(&config),
        }
    }

    /// Extract metadata from `archive` and install it into `destination`.
    pub fn install_file(
        &self,
        archive: &Path,
        is_core: bool,
        destination: &Path,
    ) -> Result<PluginMetadata> {
        let metadata = self.extractor.extract_metadata(archive, is_core)?;
        self.installer.install(metadata, Some(destination))
    }

    /// Extract metadata from `archive` and install it next to the archive.
    pub fn install_in_same_location(&self, archive: &Path, is_core: bool) -> Result<PluginMetadata> {
        let metadata = self.extractor.extract_metadata(archive, is_core)?;
        self.installer.install(metadata, None)
    }

    pub fn extract_metadata(&self, archive: &Path, is_core: bool) -> Result<PluginMetadata> {
        self.extractor.extract_metadata(archive, is_core)
    }

    pub fn install(
        &self,
        metadata: PluginMetadata,
        destination: Option<&Path>,
    ) -> Result<PluginMetadata> {
        self.installer.install(metadata, destination)
    }
}
