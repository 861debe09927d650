//! Path that passed trust-boundary validation.

use crate::Result;
use crate::paths::relative_path;
use std::path::Path;
use std::path::PathBuf;

/// A path whose resolved location was found inside a trust boundary.
///
/// `ValidatedPath` keeps both the caller's nominal addressing and the
/// resolved location that was checked. Downstream code should keep using the
/// nominal path; the resolved path is only a record of what was verified.
///
/// # Security Properties
///
/// - Can ONLY be constructed by [`crate::security::check_path`] and the
///   [`crate::security::TrustBoundary`] methods
/// - NO `From<PathBuf>` implementation
/// - The check is a snapshot: the filesystem may change afterwards
///
/// # Examples
///
/// ```no_run
/// use diskward_core::security::check_path;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let validated = check_path(Path::new("notes/a.txt"), Path::new("/srv/data"), &[] as &[&Path])?;
/// assert_eq!(validated.as_path(), Path::new("/srv/data/notes/a.txt"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedPath {
    nominal: PathBuf,
    resolved: PathBuf,
    base: PathBuf,
}

impl ValidatedPath {
    pub(crate) const fn new(nominal: PathBuf, resolved: PathBuf, base: PathBuf) -> Self {
        Self {
            nominal,
            resolved,
            base,
        }
    }

    /// Returns the nominal absolute path (the input joined to the base
    /// folder, links left in place).
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.nominal
    }

    /// Returns the resolved location that was checked.
    #[inline]
    #[must_use]
    pub fn resolved(&self) -> &Path {
        &self.resolved
    }

    /// Returns the base folder the path was validated against.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the nominal path relative to the base folder.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::PathRelation` when the nominal path lies
    /// outside the base folder, which happens for absolute inputs accepted
    /// through a trusted folder.
    pub fn relative(&self) -> Result<PathBuf> {
        relative_path(&self.nominal, &self.base)
    }

    /// Converts into the nominal `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.nominal
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.nominal
    }
}
