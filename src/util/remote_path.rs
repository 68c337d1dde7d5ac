//! Remote path string helpers
//!
//! Remote paths always use `/`, whatever the local platform, so these work on
//! plain strings rather than [`std::path::Path`].
// (c) 2026 The sftp-put authors

/// The remote path separator
pub const SEPARATOR: char = '/';

/// Does this path end with a separator (i.e. is it explicitly a directory)?
#[must_use]
pub fn has_trailing_separator(path: &str) -> bool {
    path.ends_with(SEPARATOR)
}

/// Removes any trailing separators, leaving the root (`/`) intact
#[must_use]
pub fn trim_trailing_separator(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() && path.starts_with(SEPARATOR) {
        "/"
    } else {
        trimmed
    }
}

/// Appends `name` to `base`, inserting a separator only where needed
#[must_use]
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else if has_trailing_separator(base) {
        format!("{base}{name}")
    } else {
        format!("{base}{SEPARATOR}{name}")
    }
}

/// The directory containing `path`.
///
/// Trailing separators are ignored, so the parent of `/srv/app/` is `/srv`.
/// Top-level absolute paths have the parent `/`; a bare relative name has the parent `.`
/// (the remote working directory).
#[must_use]
pub fn parent(path: &str) -> &str {
    let path = trim_trailing_separator(path);
    match path.rfind(SEPARATOR) {
        None => ".",
        Some(0) => "/",
        Some(i) => trim_trailing_separator(&path[..i]),
    }
}
