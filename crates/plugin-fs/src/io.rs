//! Additive file operations and scratch copies

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::{Error, Result};

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Copy `from` to `to`, overwriting `to` if it already exists.
///
/// The parent of `to` must exist. Copying a file onto itself leaves it
/// untouched.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if is_same_file(from, to) {
        return fs::metadata(from)
            .map(|meta| meta.len())
            .map_err(|e| Error::io(from, e));
    }
    fs::copy(from, to).map_err(|source| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy `file` into `dir` under the same file name and return the new path.
pub fn copy_into_dir(file: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = file.file_name().ok_or_else(|| Error::NoFileName {
        path: file.to_path_buf(),
    })?;
    let target = dir.join(file_name);
    copy_file(file, &target)?;
    Ok(target)
}

/// A private, temporary copy of a file.
///
/// The copy is deleted when the value is dropped, on success and error paths
/// alike. No handle stays open on either the original or the copy, so the
/// original can be moved or deleted while the copy is in use.
#[derive(Debug)]
pub struct ScratchCopy {
    path: TempPath,
}

impl ScratchCopy {
    /// Copy `source` into `scratch_dir`, or the system temp directory when
    /// `None`. The copy's name starts with the source file name.
    pub fn create(source: &Path, scratch_dir: Option<&Path>) -> Result<Self> {
        let file_name = source.file_name().ok_or_else(|| Error::NoFileName {
            path: source.to_path_buf(),
        })?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(file_name).suffix(".scratch");

        let placeholder = match scratch_dir {
            Some(dir) => builder.tempfile_in(dir).map_err(|e| Error::io(dir, e))?,
            None => builder
                .tempfile()
                .map_err(|e| Error::io(std::env::temp_dir(), e))?,
        };
        let path = placeholder.into_temp_path();

        copy_file(source, &path)?;
        tracing::debug!(source = %source.display(), scratch = %path.display(), "Created scratch copy");

        Ok(Self { path })
    }

    /// Location of the copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the copy now, reporting failure instead of ignoring it.
    pub fn close(self) -> Result<()> {
        let location = self.path.to_path_buf();
        self.path.close().map_err(|e| Error::io(location, e))
    }
}
