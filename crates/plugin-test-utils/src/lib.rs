//! Shared test utilities for the plugin-deployer workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`archive`]: [`PluginArchive`](archive::PluginArchive) builder for plugin zip files
//! - [`tree`]: directory listing helpers for before/after assertions

pub mod archive;
pub mod tree;
