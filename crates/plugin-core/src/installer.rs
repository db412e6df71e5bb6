//! Plugin installation.
//!
//! Installing places the archive, its bundled dependencies and any legacy
//! extension files into one directory, the installation base, and records
//! every written path on the metadata. Writes are additive; a failure part
//! way through leaves already copied files in place.

use std::path::{Path, PathBuf};

use plugin_fs::{EntryPath, archive, io};

use crate::config::DeployerConfig;
use crate::error::{Error, InstallFailure, Result};
use crate::key;
use crate::metadata::PluginMetadata;

/// Materializes plugins described by [`PluginMetadata`] on disk.
#[derive(Debug, Clone)]
pub struct PluginInstaller {
    library_prefix: EntryPath,
}

impl PluginInstaller {
    pub fn new(config: &DeployerConfig) -> Self {
        Self {
            library_prefix: config.library_prefix(),
        }
    }

    /// Install the plugin and return its metadata with `deployed_files`
    /// filled in.
    ///
    /// With `destination`, the archive is copied there (the directory is
    /// created if needed). Without, the archive stays where it is and its
    /// directory becomes the installation base.
    pub fn install(
        &self,
        mut metadata: PluginMetadata,
        destination: Option<&Path>,
    ) -> Result<PluginMetadata> {
        match self.deploy(&mut metadata, destination) {
            Ok(()) => {
                tracing::info!(
                    plugin = %metadata,
                    files = metadata.deployed_files().len(),
                    "Installed plugin"
                );
                Ok(metadata)
            }
            Err(source) => Err(Error::Install {
                plugin: metadata.to_string(),
                source,
            }),
        }
    }

    fn deploy(
        &self,
        metadata: &mut PluginMetadata,
        destination: Option<&Path>,
    ) -> std::result::Result<(), InstallFailure> {
        if metadata.is_installed() {
            return Err(InstallFailure::AlreadyInstalled {
                deployed: metadata.deployed_files().len(),
            });
        }
        if !key::is_valid(metadata.key()) {
            return Err(InstallFailure::InvalidKey {
                key: metadata.key().to_string(),
            });
        }

        let source = metadata.source_file().to_path_buf();
        let base = match destination {
            Some(dir) => {
                io::ensure_dir(dir)?;
                let installed = io::copy_into_dir(&source, dir)?;
                metadata.push_deployed(installed);
                dir.to_path_buf()
            }
            None => {
                let base = in_place_base(&source)?;
                metadata.push_deployed(source.clone());
                base
            }
        };

        self.deploy_dependencies(metadata, &source, &base)?;

        for extension in metadata.deprecated_extensions().to_vec() {
            let installed = io::copy_into_dir(&extension, &base)?;
            tracing::debug!(file = %installed.display(), "Copied legacy extension file");
            metadata.push_deployed(installed);
        }

        Ok(())
    }

    fn deploy_dependencies(
        &self,
        metadata: &mut PluginMetadata,
        source: &Path,
        base: &Path,
    ) -> std::result::Result<(), InstallFailure> {
        let dependencies = metadata.dependency_paths().to_vec();
        if dependencies.is_empty() {
            return Ok(());
        }
        if self.library_prefix.is_empty() {
            return Err(InstallFailure::EmptyLibraryPrefix);
        }

        archive::extract_matching(source, base, |entry| {
            entry.starts_with(&self.library_prefix)
        })?;

        for dependency in dependencies {
            let installed = EntryPath::new(&dependency).resolve_under(base);
            if !installed.is_file() {
                return Err(InstallFailure::MissingDependency {
                    dependency,
                    archive: source.to_path_buf(),
                });
            }
            metadata.push_deployed(installed);
        }

        Ok(())
    }
}

/// The directory holding `archive`. A bare file name lives in `.`.
fn in_place_base(archive: &Path) -> std::result::Result<PathBuf, InstallFailure> {
    match archive.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(InstallFailure::NoParentDirectory {
            path: archive.to_path_buf(),
        }),
    }
}
