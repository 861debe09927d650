//! Trust-boundary path validation.
//!
//! A path is accepted when its resolved location equals, or descends from,
//! the resolved base folder or one of the resolved trusted folders.
//! Comparison is component-wise, so `/srv/data-old` is never inside
//! `/srv/data`.

use crate::ArchiveError;
use crate::Result;
use crate::paths::absolute_path;
use crate::paths::resolve::MAX_LINK_HOPS;
use crate::types::ValidatedPath;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A base folder plus the folders trusted in addition to it.
///
/// Folders are resolved once at construction, so repeated checks during a
/// walk or an extraction do not re-resolve the boundary.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::security::TrustBoundary;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let boundary = TrustBoundary::new(Path::new("/srv/data"), &[Path::new("/srv/shared")])?;
///
/// // A link inside /srv/data pointing into /srv/shared is accepted
/// let validated = boundary.check(Path::new("shared-link/report.txt"))?;
/// println!("{}", validated.resolved().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrustBoundary {
    base: PathBuf,
    folders: Vec<PathBuf>,
}

impl TrustBoundary {
    /// Resolves `base` and `trusted_folders` into a boundary.
    ///
    /// Relative trusted folders are taken relative to `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder cannot be resolved, for example because
    /// a symbolic link chain in it loops.
    pub fn new<P: AsRef<Path>>(base: &Path, trusted_folders: &[P]) -> Result<Self> {
        let mut folders = Vec::with_capacity(trusted_folders.len() + 1);
        folders.push(resolve_lenient(base)?);
        for folder in trusted_folders {
            folders.push(resolve_lenient(&absolute_path(folder.as_ref(), base))?);
        }

        Ok(Self {
            base: base.to_path_buf(),
            folders,
        })
    }

    /// Returns the base folder as given by the caller.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the resolved folders, base first.
    #[must_use]
    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// Returns `true` if an already resolved path lies inside the boundary.
    #[must_use]
    pub fn contains(&self, resolved: &Path) -> bool {
        self.folders.iter().any(|folder| resolved.starts_with(folder))
    }

    /// Resolves `path` (relative paths are joined to the base) and checks it
    /// against the boundary.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::PathValidation` if the resolved location is outside
    ///   every folder of the boundary
    /// - `ArchiveError::Io` if resolution fails
    pub fn check(&self, path: &Path) -> Result<ValidatedPath> {
        let nominal = absolute_path(path, &self.base);
        let resolved = resolve_lenient(&nominal)?;

        if self.contains(&resolved) {
            Ok(ValidatedPath::new(nominal, resolved, self.base.clone()))
        } else {
            Err(ArchiveError::PathValidation {
                path: path.to_path_buf(),
                boundary: self.folders.clone(),
            })
        }
    }
}

/// Validates `path` against `base_folder` and `trusted_folders`.
///
/// Unlike [`real_path`](crate::paths::real_path), missing folders anywhere in
/// `path` are accepted: they are kept lexically while every existing link is
/// still followed. A path that does not exist yet can therefore be checked
/// before it is created, and the check never fails with `NotFound`.
///
/// # Errors
///
/// Returns `ArchiveError::PathValidation` when the resolved location of the
/// path is outside the base folder and every trusted folder.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::security::check_path;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let validated = check_path(Path::new("a/b.txt"), Path::new("/srv/data"), &[] as &[&Path])?;
/// assert_eq!(validated.relative()?, Path::new("a/b.txt"));
///
/// assert!(check_path(Path::new("../etc/passwd"), Path::new("/srv/data"), &[] as &[&Path]).is_err());
/// # Ok(())
/// # }
/// ```
pub fn check_path<P: AsRef<Path>>(
    path: &Path,
    base_folder: &Path,
    trusted_folders: &[P],
) -> Result<ValidatedPath> {
    TrustBoundary::new(base_folder, trusted_folders)?.check(path)
}

/// Validates `path` and returns it relative to `base_folder`.
///
/// # Errors
///
/// - `ArchiveError::PathValidation` if the path resolves outside the boundary
/// - `ArchiveError::PathRelation` if the path was accepted through a trusted
///   folder but is not nominally under `base_folder`
pub fn check_relative_path<P: AsRef<Path>>(
    path: &Path,
    base_folder: &Path,
    trusted_folders: &[P],
) -> Result<PathBuf> {
    check_path(path, base_folder, trusted_folders)?.relative()
}

/// Validates `path` and returns it joined to `base_folder`.
///
/// The returned path keeps the caller's addressing; links in it are not
/// replaced by their targets.
///
/// # Errors
///
/// Returns `ArchiveError::PathValidation` if the path resolves outside the
/// boundary.
pub fn check_absolute_path<P: AsRef<Path>>(
    path: &Path,
    base_folder: &Path,
    trusted_folders: &[P],
) -> Result<PathBuf> {
    Ok(check_path(path, base_folder, trusted_folders)?.into_path_buf())
}

/// Resolves `path` like [`real_path`](crate::paths::real_path), but
/// tolerates missing components anywhere in it.
///
/// Components are resolved left to right. Existing links are followed and
/// their targets resolved in turn; a missing component is kept lexically,
/// since it cannot be a link. A later `..` pops the already resolved
/// prefix, so `missing/../link` still follows `link`.
pub(crate) fn resolve_lenient(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = root_of(&absolute);
    let mut pending = Vec::new();
    push_components(&mut pending, &absolute);
    let mut hops = 0;

    while let Some(name) = pending.pop() {
        if name == "." {
            continue;
        }
        if name == ".." {
            resolved.pop();
            continue;
        }

        let candidate = resolved.join(&name);
        match fs::symlink_metadata(&candidate) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                hops += 1;
                if hops > MAX_LINK_HOPS {
                    return Err(ArchiveError::Io(io::Error::other(format!(
                        "too many levels of symbolic links: {}",
                        path.display()
                    ))));
                }
                let target = fs::read_link(&candidate)?;
                if target.has_root() {
                    resolved = root_of(&target);
                }
                push_components(&mut pending, &target);
            }
            Ok(_) => resolved = candidate,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                resolved = candidate;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(resolved)
}

/// Returns the prefix and root of `path` (`/` on Unix).
fn root_of(path: &Path) -> PathBuf {
    path.components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Queues the non-root components of `path` so that the first one is popped
/// first.
fn push_components(pending: &mut Vec<OsString>, path: &Path) {
    let names = path.components().filter_map(|c| match c {
        Component::Prefix(_) | Component::RootDir => None,
        other => Some(other.as_os_str().to_os_string()),
    });
    let start = pending.len();
    pending.extend(names);
    pending[start..].reverse();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NO_TRUSTED: &[&Path] = &[];

    /// Builds `root/A/x.txt` and `root/B/` and returns the canonical root.
    fn setup_folders() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir(root.join("A")).unwrap();
        fs::create_dir(root.join("B")).unwrap();
        fs::write(root.join("A/x.txt"), "x").unwrap();
        (temp, root)
    }

    #[test]
    fn test_check_path_inside_base() {
        let (_temp, root) = setup_folders();
        let base = root.join("A");

        let validated = check_path(Path::new("x.txt"), &base, NO_TRUSTED).unwrap();
        assert_eq!(validated.as_path(), base.join("x.txt"));
        assert_eq!(validated.resolved(), base.join("x.txt"));
    }

    #[test]
    fn test_check_path_parent_escape() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");

        let result = check_path(Path::new("../A/x.txt"), &base, NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
    }

    #[test]
    fn test_check_path_absolute_outside() {
        let (_temp, root) = setup_folders();

        let result = check_path(&root.join("A/x.txt"), &root.join("B"), NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
    }

    #[test]
    fn test_check_path_sibling_with_shared_prefix() {
        let (_temp, root) = setup_folders();
        fs::create_dir(root.join("A-old")).unwrap();

        let result = check_path(&root.join("A-old"), &root.join("A"), NO_TRUSTED);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_path_not_yet_created() {
        let (_temp, root) = setup_folders();
        let base = root.join("A");

        let validated = check_path(Path::new("new/deeper/file.txt"), &base, NO_TRUSTED).unwrap();
        assert_eq!(validated.resolved(), base.join("new/deeper/file.txt"));
    }

    #[test]
    fn test_check_relative_and_absolute_shapes() {
        let (_temp, root) = setup_folders();
        let base = root.join("A");

        let relative = check_relative_path(Path::new("x.txt"), &base, NO_TRUSTED).unwrap();
        assert_eq!(relative, Path::new("x.txt"));

        let absolute = check_absolute_path(Path::new("x.txt"), &base, NO_TRUSTED).unwrap();
        assert_eq!(absolute, base.join("x.txt"));
    }

    #[test]
    fn test_boundary_lists_base_first() {
        let (_temp, root) = setup_folders();

        let boundary = TrustBoundary::new(&root.join("B"), &[root.join("A")]).unwrap();
        assert_eq!(boundary.folders(), [root.join("B"), root.join("A")]);
        assert!(boundary.contains(&root.join("A/x.txt")));
        assert!(!boundary.contains(&root));
    }

    #[cfg(unix)]
    #[test]
    fn test_link_into_untrusted_folder_rejected() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");
        std::os::unix::fs::symlink(root.join("A/x.txt"), base.join("x.txt")).unwrap();

        let result = check_path(Path::new("x.txt"), &base, NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_link_into_trusted_folder_accepted() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");
        std::os::unix::fs::symlink(root.join("A/x.txt"), base.join("x.txt")).unwrap();

        let validated = check_path(Path::new("x.txt"), &base, &[root.join("A")]).unwrap();
        assert_eq!(validated.as_path(), base.join("x.txt"));
        assert_eq!(validated.resolved(), root.join("A/x.txt"));

        let relative = check_relative_path(Path::new("x.txt"), &base, &[root.join("A")]).unwrap();
        assert_eq!(relative, Path::new("x.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_trusted_folder_joined_to_base() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");
        std::os::unix::fs::symlink(root.join("A"), base.join("a-link")).unwrap();

        let validated = check_path(Path::new("a-link/x.txt"), &base, &[Path::new("../A")]).unwrap();
        assert_eq!(validated.resolved(), root.join("A/x.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directory_escape_for_new_file() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");
        std::os::unix::fs::symlink(root.join("A"), base.join("escape")).unwrap();

        // The file does not exist yet, but its parent resolves outside B
        let result = check_path(Path::new("escape/new.txt"), &base, NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_accepted_absolute_path_is_not_relative_to_base() {
        let (_temp, root) = setup_folders();

        let result = check_relative_path(&root.join("A/x.txt"), &root.join("B"), &[root.join("A")]);
        assert!(matches!(result, Err(ArchiveError::PathRelation { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_folder_then_parent_still_follows_link() {
        let (_temp, root) = setup_folders();
        let base = root.join("B");
        std::os::unix::fs::symlink(root.join("A"), base.join("escape")).unwrap();

        let result = check_path(Path::new("missing/../escape/new.txt"), &base, NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));

        let result = check_path(Path::new("missing/../../A/x.txt"), &base, NO_TRUSTED);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_lenient_link_loop() {
        let (_temp, root) = setup_folders();
        std::os::unix::fs::symlink("loop-b", root.join("B/loop-a")).unwrap();
        std::os::unix::fs::symlink("loop-a", root.join("B/loop-b")).unwrap();

        let result = resolve_lenient(&root.join("B/loop-a/x.txt"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_resolve_lenient_missing_tail() {
        let (_temp, root) = setup_folders();
        let resolved = resolve_lenient(&root.join("A/./new/deeper/../file.txt")).unwrap();
        assert_eq!(resolved, root.join("A/new/file.txt"));
    }
}
