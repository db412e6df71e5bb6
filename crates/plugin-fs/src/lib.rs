//! Filesystem abstraction for Plugin Deployer
//!
//! Provides contextual I/O errors, scratch copies, archive entry paths and
//! selective archive extraction.

pub mod archive;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use entry::EntryPath;
pub use error::{Error, Result};
pub use io::ScratchCopy;
