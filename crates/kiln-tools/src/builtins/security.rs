//! Path sandboxing for project tools

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Resolve `relative` against `base`, refusing anything that would land
/// outside `base`.
///
/// Absolute paths, `..` components and empty paths are rejected. When the
/// nearest existing ancestor of the target is a symlink leading out of
/// `base`, the path is rejected as well.
pub fn resolve_within(base: &Path, relative: &str) -> Result<PathBuf> {
    let relative_path = Path::new(relative);
    if relative.trim().is_empty() {
        return Err(Error::BadArguments("path must not be empty".to_string()));
    }

    let mut clean = PathBuf::new();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                warn!(path = %relative, "Path traversal attempt detected");
                return Err(Error::OutsideSandbox(relative.to_string()));
            }
            Component::RootDir | Component::Prefix(_) => {
                warn!(path = %relative, "Absolute path rejected");
                return Err(Error::OutsideSandbox(relative.to_string()));
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(Error::BadArguments("path must name a file".to_string()));
    }

    let target = base.join(&clean);

    // SECURITY: resolve symlinks on the deepest existing ancestor
    if let Ok(canonical_base) = base.canonicalize() {
        let mut probe = target.as_path();
        while !probe.exists() {
            match probe.parent() {
                Some(parent) => probe = parent,
                None => break,
            }
        }
        if probe.exists() {
            let canonical = probe.canonicalize()?;
            if !canonical.starts_with(&canonical_base) {
                warn!(
                    path = %relative,
                    resolved = %canonical.display(),
                    "Symlink escape blocked"
                );
                return Err(Error::OutsideSandbox(relative.to_string()));
            }
        }
    }

    debug!(path = %relative, target = %target.display(), "Path validated");
    Ok(target)
}
