//! Absolute, real and relative path computation.

use crate::ArchiveError;
use crate::Result;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Maximum number of symbolic links followed while resolving one path.
///
/// Matches the `ELOOP` limit used by Linux path resolution.
pub(crate) const MAX_LINK_HOPS: usize = 40;

/// Joins a relative `path` to `base_folder`; absolute paths are returned
/// as-is.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::absolute_path;
/// use std::path::Path;
///
/// let base = Path::new("/srv/data");
/// assert_eq!(absolute_path(Path::new("a.txt"), base), Path::new("/srv/data/a.txt"));
/// assert_eq!(absolute_path(Path::new("/etc/hosts"), base), Path::new("/etc/hosts"));
/// ```
#[must_use]
pub fn absolute_path(path: &Path, base_folder: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_folder.join(path)
    }
}

/// Resolves every symbolic link in `path`, including the final component.
///
/// Unlike [`std::fs::canonicalize`], the final component does not have to
/// exist, so the result can describe a path that is about to be created.
/// A dangling link in final position is followed to where it would point.
/// Relative paths are taken relative to the current working directory.
///
/// # Errors
///
/// - `ArchiveError::NotFound` if an intermediate component does not exist
/// - `ArchiveError::Io` for other resolution failures, including link chains
///   longer than 40 hops
///
/// # Examples
///
/// ```no_run
/// use diskward_core::paths::real_path;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let resolved = real_path(Path::new("/tmp/not-created-yet.txt"))?;
/// # Ok(())
/// # }
/// ```
pub fn real_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    resolve_with_hops(&absolute, path, MAX_LINK_HOPS)
}

fn resolve_with_hops(absolute: &Path, requested: &Path, hops: usize) -> Result<PathBuf> {
    match fs::canonicalize(absolute) {
        Ok(resolved) => return Ok(resolved),
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
        Err(_) => {}
    }

    // Either the final component is absent, it is a dangling link, or an
    // intermediate component is missing.
    let not_found = || ArchiveError::NotFound {
        path: requested.to_path_buf(),
    };
    let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) else {
        return Err(not_found());
    };
    let parent = match fs::canonicalize(parent) {
        Ok(parent) => parent,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    let candidate = parent.join(name);
    match fs::symlink_metadata(&candidate) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            if hops == 0 {
                return Err(ArchiveError::Io(io::Error::other(format!(
                    "too many levels of symbolic links: {}",
                    requested.display()
                ))));
            }
            // Absolute targets replace the parent when joined.
            let target = parent.join(fs::read_link(&candidate)?);
            resolve_with_hops(&target, requested, hops - 1)
        }
        _ => Ok(candidate),
    }
}

/// Computes `path` relative to `base_folder` without touching the disk.
///
/// Both paths are normalized lexically (`.` dropped, `..` popped) before
/// comparison. Symbolic links are NOT resolved: validate with
/// [`crate::security::check_relative_path`] when the path may contain links.
/// A path equal to the base yields `.`.
///
/// # Errors
///
/// Returns `ArchiveError::PathRelation` if `path` is not `base_folder` or a
/// descendant of it.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::relative_path;
/// use std::path::Path;
///
/// let rel = relative_path(Path::new("/srv/data/a/./b.txt"), Path::new("/srv/data")).unwrap();
/// assert_eq!(rel, Path::new("a/b.txt"));
///
/// assert!(relative_path(Path::new("/srv/other"), Path::new("/srv/data")).is_err());
/// ```
pub fn relative_path(path: &Path, base_folder: &Path) -> Result<PathBuf> {
    let normalized = normalize(&absolute_path(path, base_folder));
    let base = normalize(base_folder);

    match normalized.strip_prefix(&base) {
        Ok(relative) if relative.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Ok(relative) => Ok(relative.to_path_buf()),
        Err(_) => Err(ArchiveError::PathRelation {
            path: path.to_path_buf(),
            base: base_folder.to_path_buf(),
        }),
    }
}

/// Lexically removes `.` and resolves `..` against preceding components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            Component::Normal(_) | Component::RootDir | Component::Prefix(_) => {
                normalized.push(component);
            }
        }
    }
    normalized
}
