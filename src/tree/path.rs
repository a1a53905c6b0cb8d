//! Path canonicalization and leaf key utilities

use crate::error::TreeError;
use std::path::{Component, Path, PathBuf};

/// Canonicalize a root directory path
///
/// Resolves symlinks, `..` and `.` using dunce so Windows paths stay free of
/// the `\\?\` prefix.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, TreeError> {
    dunce::canonicalize(path).map_err(|e| TreeError::io(path, e))
}

/// Compute the forward-slash relative key of `path` under `root`
///
/// Component names are taken as they are on disk. Fails with
/// `TreeError::NonUtf8Path` when a component is not valid UTF-8.
pub fn relative_key(root: &Path, path: &Path) -> Result<String, TreeError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        TreeError::InvalidPath(format!("{:?} is not under {:?}", path, root))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => {
                let name = name
                    .to_str()
                    .ok_or_else(|| TreeError::NonUtf8Path(path.to_path_buf()))?;
                parts.push(name);
            }
            Component::CurDir => {}
            other => {
                return Err(TreeError::InvalidPath(format!(
                    "Unexpected component {:?} in {:?}",
                    other, path
                )))
            }
        }
    }

    if parts.is_empty() {
        return Err(TreeError::InvalidPath(format!(
            "{:?} has no path below the root",
            path
        )));
    }

    Ok(parts.join("/"))
}

/// Subject identifier for a folder: the final component of its canonical path
pub fn subject_name(folder: &Path) -> Result<String, TreeError> {
    let canonical = canonicalize_path(folder)?;
    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    Ok(name)
}
