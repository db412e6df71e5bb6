#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use plugin_core::{EntryPointLoader, LoadError, PluginEntryPoint};

/// Entry point reporting fixed identity values.
#[derive(Debug, Clone)]
pub struct StaticEntryPoint {
    pub key: String,
    pub name: String,
    pub description: String,
}

impl StaticEntryPoint {
    pub fn new(key: &str, name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

impl PluginEntryPoint for StaticEntryPoint {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// What the loader saw during one `load` call.
#[derive(Debug, Clone)]
pub struct LoadCall {
    pub identifier: String,
    pub archive: PathBuf,
    pub archive_existed: bool,
    pub content: Vec<u8>,
}

/// Loader that records every call and answers with a fixed entry point.
#[derive(Debug)]
pub struct RecordingLoader {
    entry_point: StaticEntryPoint,
    calls: Mutex<Vec<LoadCall>>,
}

impl RecordingLoader {
    pub fn new(entry_point: StaticEntryPoint) -> Self {
        Self {
            entry_point,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<LoadCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl EntryPointLoader for RecordingLoader {
    fn load(&self, identifier: &str, archive: &Path) -> Result<Box<dyn PluginEntryPoint>, LoadError> {
        self.calls.lock().unwrap().push(LoadCall {
            identifier: identifier.to_string(),
            archive: archive.to_path_buf(),
            archive_existed: archive.is_file(),
            content: std::fs::read(archive).unwrap_or_default(),
        });
        Ok(Box::new(self.entry_point.clone()))
    }
}
