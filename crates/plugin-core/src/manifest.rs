//! Plugin manifest reading.
//!
//! A plugin archive carries a JAR-style manifest (by default
//! `META-INF/MANIFEST.MF`). Only the main section is read: `Name: value`
//! lines, where a line starting with a single space continues the previous
//! value, terminated by the first blank line.
//!
//! # Example manifest
//!
//! ```text
//! Manifest-Version: 1.0
//! Plugin-Key: checkstyle
//! Plugin-Name: Checkstyle
//! Plugin-Description: Checkstyle rules
//! Plugin-Version: 2.1
//! Plugin-Class: org.example.checkstyle.CheckstylePlugin
//! Plugin-Dependencies: META-INF/lib/checkstyle-5.1.jar META-INF/lib/antl
//!  r-2.7.6.jar
//! Plugin-ChildFirstClassLoader: false
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use plugin_fs::{EntryPath, archive};

use crate::error::{Error, Result};

/// Attribute names read from the manifest. Lookups ignore case.
pub mod attributes {
    pub const KEY: &str = "Plugin-Key";
    pub const NAME: &str = "Plugin-Name";
    pub const DESCRIPTION: &str = "Plugin-Description";
    pub const VERSION: &str = "Plugin-Version";
    pub const MAIN_CLASS: &str = "Plugin-Class";
    pub const LICENSE: &str = "Plugin-License";
    pub const ORGANIZATION: &str = "Plugin-Organization";
    pub const ORGANIZATION_URL: &str = "Plugin-OrganizationUrl";
    pub const HOMEPAGE: &str = "Plugin-Homepage";
    pub const DEPENDENCIES: &str = "Plugin-Dependencies";
    pub const CHILD_FIRST_CLASS_LOADER: &str = "Plugin-ChildFirstClassLoader";
    pub const BASE_PLUGIN: &str = "Plugin-Base";
}

/// Malformed manifest syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed manifest at line {line}: {reason}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

/// Raw fields read from a plugin manifest.
///
/// Absent attributes read as empty strings, an empty dependency list,
/// `false` and `None`. Values are trimmed. The key is kept exactly as
/// declared; sanitizing happens when metadata is built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginManifest {
    pub key: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub main_class: String,
    pub license: String,
    pub organization: String,
    pub organization_url: String,
    pub homepage: String,
    /// In-archive paths of bundled dependency files, in declared order.
    pub dependencies: Vec<String>,
    pub use_child_first_class_loader: bool,
    pub base_plugin: Option<String>,
}

impl PluginManifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        let section = parse_main_section(text)?;

        let text_of = |name: &str| {
            section
                .get(&name.to_ascii_lowercase())
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let dependencies = text_of(attributes::DEPENDENCIES)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let base_plugin = Some(text_of(attributes::BASE_PLUGIN)).filter(|base| !base.is_empty());

        Ok(Self {
            key: text_of(attributes::KEY),
            name: text_of(attributes::NAME),
            description: text_of(attributes::DESCRIPTION),
            version: text_of(attributes::VERSION),
            main_class: text_of(attributes::MAIN_CLASS),
            license: text_of(attributes::LICENSE),
            organization: text_of(attributes::ORGANIZATION),
            organization_url: text_of(attributes::ORGANIZATION_URL),
            homepage: text_of(attributes::HOMEPAGE),
            dependencies,
            use_child_first_class_loader: text_of(attributes::CHILD_FIRST_CLASS_LOADER)
                .eq_ignore_ascii_case("true"),
            base_plugin,
        })
    }

    /// Read and parse the manifest stored at `entry` inside `archive`.
    pub fn from_archive(archive_path: &Path, entry: &EntryPath) -> Result<Self> {
        let bytes = archive::read_entry(archive_path, entry)
            .map_err(|source| Error::Extraction {
                path: archive_path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| Error::ManifestMissing {
                path: archive_path.to_path_buf(),
                entry: entry.to_string(),
            })?;

        let text = String::from_utf8_lossy(&bytes);
        Self::parse(&text).map_err(|source| Error::ManifestParse {
            path: archive_path.to_path_buf(),
            source,
        })
    }

    /// Whether the manifest lacks the identity fields and the entry point
    /// must be asked for them instead.
    pub fn is_legacy(&self) -> bool {
        self.key.is_empty() || self.name.is_empty() || self.description.is_empty()
    }
}

fn parse_main_section(text: &str) -> std::result::Result<BTreeMap<String, String>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut attributes = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for (index, raw_line) in text.split('\n').enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            break;
        }

        if let Some(continuation) = line.strip_prefix(' ') {
            match current.as_mut() {
                Some((_, value)) => value.push_str(continuation),
                None => {
                    return Err(ParseError {
                        line: index + 1,
                        reason: "continuation line without a preceding attribute".to_string(),
                    });
                }
            }
            continue;
        }

        if let Some((name, value)) = current.take() {
            attributes.insert(name, value);
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(ParseError {
                line: index + 1,
                reason: format!("expected 'Name: value', found {line:?}"),
            });
        };

        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ParseError {
                line: index + 1,
                reason: format!("invalid attribute name {name:?}"),
            });
        }

        let value = value.strip_prefix(' ').unwrap_or(value);
        current = Some((name.to_ascii_lowercase(), value.to_string()));
    }

    if let Some((name, value)) = current {
        attributes.insert(name, value);
    }

    Ok(attributes)
}
