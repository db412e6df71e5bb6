//! Plugin metadata.
//!
//! [`PluginMetadata`] is built in two phases. [`PluginMetadata::from_manifest`]
//! copies the raw manifest fields; for legacy manifests the extractor then
//! merges a [`LegacyOverlay`] obtained from the entry point. The installer
//! only ever appends to the deployed file list.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::key;
use crate::legacy::LegacyOverlay;
use crate::manifest::PluginManifest;

/// Descriptive and deployment information about one plugin archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginMetadata {
    key: String,
    name: String,
    description: String,
    license: String,
    organization: String,
    organization_url: String,
    homepage: String,
    version: String,
    #[serde(rename = "mainClassName")]
    main_class: String,
    dependency_paths: Vec<String>,
    use_child_first_class_loader: bool,
    #[serde(rename = "basePluginKey")]
    base_plugin: Option<String>,
    #[serde(rename = "isCore")]
    core: bool,
    source_file: PathBuf,
    deployed_files: Vec<PathBuf>,
    #[serde(rename = "isLegacyManifest")]
    legacy_manifest: bool,
    #[serde(rename = "deprecatedExtensionFiles")]
    deprecated_extensions: Vec<PathBuf>,
}

impl PluginMetadata {
    /// Empty metadata for the archive at `source_file`.
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            description: String::new(),
            license: String::new(),
            organization: String::new(),
            organization_url: String::new(),
            homepage: String::new(),
            version: String::new(),
            main_class: String::new(),
            dependency_paths: Vec::new(),
            use_child_first_class_loader: false,
            base_plugin: None,
            core: false,
            source_file: source_file.into(),
            deployed_files: Vec::new(),
            legacy_manifest: false,
            deprecated_extensions: Vec::new(),
        }
    }

    /// First phase: copy every manifest field. The key is sanitized.
    pub fn from_manifest(source_file: &Path, manifest: &PluginManifest, core: bool) -> Self {
        Self {
            key: key::sanitize(&manifest.key),
            name: manifest.name.clone(),
            description: manifest.description.clone(),
            license: manifest.license.clone(),
            organization: manifest.organization.clone(),
            organization_url: manifest.organization_url.clone(),
            homepage: manifest.homepage.clone(),
            version: manifest.version.clone(),
            main_class: manifest.main_class.clone(),
            dependency_paths: manifest.dependencies.clone(),
            use_child_first_class_loader: manifest.use_child_first_class_loader,
            base_plugin: manifest.base_plugin.clone(),
            core,
            legacy_manifest: manifest.is_legacy(),
            ..Self::new(source_file)
        }
    }

    /// Second phase: take identity fields reported by the entry point.
    pub fn apply_overlay(self, overlay: LegacyOverlay) -> Self {
        Self {
            key: overlay.key,
            name: overlay.name,
            description: overlay.description,
            ..self
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = main_class.into();
        self
    }

    pub fn with_dependency_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependency_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Register an auxiliary file to be copied next to the archive on install.
    pub fn add_deprecated_extension(&mut self, file: impl Into<PathBuf>) {
        self.deprecated_extensions.push(file.into());
    }

    pub(crate) fn push_deployed(&mut self, file: PathBuf) {
        self.deployed_files.push(file);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn organization_url(&self) -> &str {
        &self.organization_url
    }

    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Identifier of the plugin's entry point.
    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    /// In-archive paths of bundled dependencies, in declared order.
    pub fn dependency_paths(&self) -> &[String] {
        &self.dependency_paths
    }

    pub fn use_child_first_class_loader(&self) -> bool {
        self.use_child_first_class_loader
    }

    /// Key of the plugin this one extends.
    pub fn base_plugin(&self) -> Option<&str> {
        self.base_plugin.as_deref()
    }

    pub fn is_core(&self) -> bool {
        self.core
    }

    /// The original archive. Never written to.
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Files written for this plugin: the archive first, then dependencies,
    /// then legacy extension files.
    pub fn deployed_files(&self) -> &[PathBuf] {
        &self.deployed_files
    }

    pub fn is_legacy_manifest(&self) -> bool {
        self.legacy_manifest
    }

    pub fn deprecated_extensions(&self) -> &[PathBuf] {
        &self.deprecated_extensions
    }

    pub fn is_installed(&self) -> bool {
        !self.deployed_files.is_empty()
    }
}

impl fmt::Display for PluginMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_name = self
            .source_file
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| self.source_file.to_string_lossy());
        if self.key.is_empty() {
            write!(f, "({file_name})")
        } else {
            write!(f, "{} ({file_name})", self.key)
        }
    }
}
