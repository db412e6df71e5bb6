//! Metadata extraction from plugin archives.

use std::path::Path;

use plugin_fs::EntryPath;

use crate::config::DeployerConfig;
use crate::error::Result;
use crate::legacy::LegacyResolver;
use crate::manifest::PluginManifest;
use crate::metadata::PluginMetadata;

/// Reads an archive's manifest into [`PluginMetadata`], asking the legacy
/// resolver for identity fields when the manifest lacks them.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    manifest_entry: EntryPath,
    resolver: LegacyResolver,
}

impl MetadataExtractor {
    pub fn new(config: &DeployerConfig, resolver: LegacyResolver) -> Self {
        Self {
            manifest_entry: config.manifest_entry(),
            resolver,
        }
    }

    /// Build metadata for `archive`.
    ///
    /// `is_core` marks plugins shipped with the host. Nothing is written; the
    /// legacy resolver works on its own scratch copy.
    pub fn extract_metadata(&self, archive: &Path, is_core: bool) -> Result<PluginMetadata> {
        let manifest = PluginManifest::from_archive(archive, &self.manifest_entry)?;
        let metadata = PluginMetadata::from_manifest(archive, &manifest, is_core);

        if !metadata.is_legacy_manifest() {
            tracing::debug!(plugin = %metadata, "Extracted plugin metadata");
            return Ok(metadata);
        }

        tracing::debug!(
            archive = %archive.display(),
            main_class = metadata.main_class(),
            "Manifest is incomplete, querying entry point"
        );
        let overlay = self.resolver.resolve(&metadata)?;
        let metadata = metadata.apply_overlay(overlay);
        tracing::debug!(plugin = %metadata, "Extracted legacy plugin metadata");

        Ok(metadata)
    }
}
