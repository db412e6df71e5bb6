//! Plugin key sanitization.
//!
//! A canonical key contains only letters and digits. Artifact-style names
//! such as `checkstyle-plugin` are reduced to their stem first.

const ARTIFACT_SUFFIX: &str = "-plugin";

/// Reduce `raw` to its canonical key form.
///
/// Surrounding whitespace and a trailing `-plugin` are dropped, then every
/// character that is not a letter or digit is removed. The result may be
/// empty; check it with [`is_valid`].
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let stem = match trimmed.strip_suffix(ARTIFACT_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => trimmed,
    };
    stem.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Whether `key` is non-empty and already canonical.
pub fn is_valid(key: &str) -> bool {
    !key.is_empty() && key.chars().all(char::is_alphanumeric)
}
