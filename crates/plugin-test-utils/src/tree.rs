//! Directory listing helpers.

use std::fs;
use std::path::Path;

/// List every file below `root` as a sorted, slash-separated relative path.
///
/// # Panics
/// Panics if `root` cannot be read.
pub fn relative_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("relative_files: failed to read {}: {e}", dir.display()));

    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("relative_files: bad entry in {}: {e}", dir.display()))
            .path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path
                .strip_prefix(root)
                .unwrap_or_else(|e| panic!("relative_files: {e}"));
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}
