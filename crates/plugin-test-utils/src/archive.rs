//! [`PluginArchive`] builder for plugin zip fixtures.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::FileOptions;

/// Location of the manifest inside every fixture archive.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Builder for a plugin archive written to disk as a zip file.
///
/// # Example
///
/// ```rust,no_run
/// use plugin_test_utils::archive::PluginArchive;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = PluginArchive::complete("checkstyle.jar", "checkstyle")
///     .attribute("Plugin-Dependencies", "META-INF/lib/a.jar")
///     .entry("META-INF/lib/a.jar", b"a")
///     .write_to(dir.path());
/// assert!(path.is_file());
/// ```
#[derive(Debug, Clone)]
pub struct PluginArchive {
    file_name: String,
    attributes: Vec<(String, String)>,
    raw_manifest: Option<String>,
    include_manifest: bool,
    entries: Vec<FixtureEntry>,
}

#[derive(Debug, Clone)]
struct FixtureEntry {
    name: String,
    content: Vec<u8>,
    mode: Option<u32>,
}

impl PluginArchive {
    /// An archive with an empty manifest and no entries.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            attributes: Vec::new(),
            raw_manifest: None,
            include_manifest: true,
            entries: Vec::new(),
        }
    }

    /// An archive whose manifest declares key, name, description, version
    /// and entry point, so no legacy resolution is needed.
    pub fn complete(file_name: impl Into<String>, key: &str) -> Self {
        Self::new(file_name)
            .attribute("Plugin-Key", key)
            .attribute("Plugin-Name", &format!("{key} name"))
            .attribute("Plugin-Description", &format!("{key} description"))
            .attribute("Plugin-Version", "1.0")
            .attribute("Plugin-Class", &format!("org.example.{key}.Entry"))
    }

    /// Add a manifest attribute.
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Use `text` verbatim as the manifest, ignoring attributes.
    pub fn raw_manifest(mut self, text: &str) -> Self {
        self.raw_manifest = Some(text.to_string());
        self
    }

    /// Do not write a manifest entry at all.
    pub fn without_manifest(mut self) -> Self {
        self.include_manifest = false;
        self
    }

    /// Add a file entry. Names ending in `/` become directory entries.
    pub fn entry(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            content: content.to_vec(),
            mode: None,
        });
        self
    }

    /// Add a file entry carrying unix permission bits.
    pub fn entry_with_mode(mut self, name: &str, content: &[u8], mode: u32) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            content: content.to_vec(),
            mode: Some(mode),
        });
        self
    }

    /// Render the manifest text the archive will contain.
    pub fn manifest_text(&self) -> String {
        if let Some(raw) = &self.raw_manifest {
            return raw.clone();
        }
        let mut text = String::from("Manifest-Version: 1.0\r\n");
        for (name, value) in &self.attributes {
            text.push_str(&format!("{name}: {value}\r\n"));
        }
        text.push_str("\r\n");
        text
    }

    /// Write the archive into `dir` and return its path.
    ///
    /// # Panics
    /// Panics if the archive cannot be written.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join(&self.file_name);
        let file = File::create(&path)
            .unwrap_or_else(|e| panic!("PluginArchive: failed to create {}: {e}", path.display()));

        let mut writer = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        if self.include_manifest {
            writer
                .start_file(MANIFEST_ENTRY, options)
                .unwrap_or_else(|e| panic!("PluginArchive: failed to start manifest: {e}"));
            writer
                .write_all(self.manifest_text().as_bytes())
                .unwrap_or_else(|e| panic!("PluginArchive: failed to write manifest: {e}"));
        }

        for FixtureEntry {
            name,
            content,
            mode,
        } in &self.entries
        {
            let options = match mode {
                Some(mode) => options.unix_permissions(*mode),
                None => options,
            };
            if name.ends_with('/') {
                writer
                    .add_directory(name.as_str(), options)
                    .unwrap_or_else(|e| panic!("PluginArchive: failed to add {name}: {e}"));
                continue;
            }
            writer
                .start_file(name.as_str(), options)
                .unwrap_or_else(|e| panic!("PluginArchive: failed to start {name}: {e}"));
            writer
                .write_all(content)
                .unwrap_or_else(|e| panic!("PluginArchive: failed to write {name}: {e}"));
        }

        writer
            .finish()
            .unwrap_or_else(|e| panic!("PluginArchive: failed to finish {}: {e}", path.display()));

        path
    }
}
