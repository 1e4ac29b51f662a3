//! Path confinement shared by extraction and file reads
//!
//! Every path that comes from outside the process (archive entry names,
//! file paths requested by callers) goes through [`sanitize_relative`]
//! before it is joined onto a sandbox root. A path that survives
//! sanitization can only name a descendant of the root.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Reasons a path is refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathViolation {
    #[error("absolute path: {0}")]
    Absolute(String),

    #[error("parent directory traversal: {0}")]
    Traversal(String),
}

/// Normalize an untrusted relative path.
///
/// `.` components are dropped. Root, drive prefix and `..` components are
/// rejected outright rather than resolved, so `a/../b` is refused even though
/// it would stay inside the root.
pub fn sanitize_relative(raw: &Path) -> Result<PathBuf, PathViolation> {
    let mut clean = PathBuf::new();

    for component in raw.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(PathViolation::Traversal(raw.display().to_string()))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathViolation::Absolute(raw.display().to_string()))
            }
        }
    }

    Ok(clean)
}

/// Join a sanitized form of `raw` onto `root`.
pub fn resolve_within(root: &Path, raw: &Path) -> Result<PathBuf, PathViolation> {
    let relative = sanitize_relative(raw)?;
    let resolved = root.join(relative);
    debug_assert!(resolved.starts_with(root));
    Ok(resolved)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
