//! Zip archive primitives
//!
//! Plugin archives are plain zip containers. Two operations are needed on
//! them: reading a single entry, and extracting the subset of entries that
//! match a predicate into a directory.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::io::ensure_dir;
use crate::{EntryPath, Error, Result};

fn open(archive: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    ZipArchive::new(file).map_err(|e| Error::archive(archive, e))
}

/// Read the bytes of entry `name`.
///
/// Returns `Ok(None)` when the archive is readable but has no such entry.
pub fn read_entry(archive: &Path, name: &EntryPath) -> Result<Option<Vec<u8>>> {
    let mut zip = open(archive)?;

    let mut file = match zip.by_name(name.as_str()) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::archive(archive, e)),
    };

    // The declared size comes from the archive and is not trusted.
    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| Error::io(archive, e))?;

    Ok(Some(content))
}

/// Extract every entry accepted by `predicate` into `dest`, keeping the
/// in-archive directory structure. Entries that are rejected are not read.
///
/// Existing files are overwritten, and extracted files always stay writable
/// by their owner. Entries whose names would escape `dest` are skipped.
/// Returns the paths of the extracted files (not directories) in archive
/// order.
pub fn extract_matching<P>(archive: &Path, dest: &Path, mut predicate: P) -> Result<Vec<PathBuf>>
where
    P: FnMut(&EntryPath) -> bool,
{
    let mut zip = open(archive)?;
    let mut extracted = Vec::new();

    for index in 0..zip.len() {
        let mut file = zip
            .by_index(index)
            .map_err(|e| Error::archive(archive, e))?;

        if file.enclosed_name().is_none() {
            tracing::warn!(entry = file.name(), archive = %archive.display(), "Skipping unsafe archive entry");
            continue;
        }

        let entry = EntryPath::new(file.name());
        if entry.is_empty() || !predicate(&entry) {
            continue;
        }

        let target = entry.resolve_under(dest);
        if file.is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        let mut out = File::create(&target).map_err(|e| Error::io(&target, e))?;
        std::io::copy(&mut file, &mut out).map_err(|e| Error::io(&target, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Owner write stays set so a later install can overwrite the file.
            if let Some(mode) = file.unix_mode() {
                let mode = (mode & 0o7777) | 0o200;
                std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| Error::io(&target, e))?;
            }
        }

        extracted.push(target);
    }

    tracing::debug!(
        archive = %archive.display(),
        dest = %dest.display(),
        count = extracted.len(),
        "Extracted matching archive entries"
    );

    Ok(extracted)
}
