//! Scoped temporary folders.

use crate::Result;
use crate::folders::make_unique_folder;
use crate::folders::remove_folder;
use std::path::Path;
use std::path::PathBuf;

/// A uniquely named folder that is removed, with its contents, when the
/// value goes out of scope.
///
/// Removal on drop is best effort: failures are logged and otherwise
/// ignored. Call [`close`](Self::close) to observe them.
///
/// # Examples
///
/// ```
/// use diskward_core::TemporaryFolder;
///
/// # fn main() -> Result<(), diskward_core::ArchiveError> {
/// let path = {
///     let folder = TemporaryFolder::new()?;
///     std::fs::write(folder.path().join("scratch.txt"), "x")?;
///     folder.path().to_path_buf()
/// };
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TemporaryFolder {
    path: PathBuf,
    released: bool,
}

impl TemporaryFolder {
    /// Creates a temporary folder inside the system temporary folder.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the folder cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::from_path(make_unique_folder(None)?))
    }

    /// Creates a temporary folder inside `base_folder`, creating the base
    /// if needed. The base itself is left alone on removal.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if either folder cannot be created.
    pub fn new_in<P: AsRef<Path>>(base_folder: P) -> Result<Self> {
        Ok(Self::from_path(make_unique_folder(Some(base_folder.as_ref()))?))
    }

    const fn from_path(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    /// Returns the folder path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the folder now and reports any failure.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the folder exists but cannot be removed.
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        remove_folder(&self.path)?;
        Ok(())
    }
}

impl AsRef<Path> for TemporaryFolder {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TemporaryFolder {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_folder(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temporary folder");
        }
    }
}
