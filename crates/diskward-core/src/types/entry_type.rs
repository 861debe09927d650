//! What a walked path turned out to be.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Kind of a folder entry, as seen without following it.
///
/// Links keep their raw target so callers can decide later whether the link
/// may be stored or followed.
///
/// # Examples
///
/// ```
/// use diskward_core::types::EntryType;
/// use std::path::PathBuf;
///
/// let link = EntryType::Symlink {
///     target: PathBuf::from("../outside/secret.txt"),
/// };
/// assert!(link.is_symlink());
/// assert!(!EntryType::Directory.is_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file, or anything else that is read as a byte stream.
    File,

    /// Folder.
    Directory,

    /// Symbolic link with the target as written in the link, which may be
    /// relative, absolute or dangling.
    Symlink {
        /// Raw link content.
        target: PathBuf,
    },
}

impl EntryType {
    /// Classifies `path` from its already fetched `file_type`.
    ///
    /// Only links touch the filesystem again, to read their target.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `path` is a link whose target cannot be read.
    pub fn from_file_type(file_type: fs::FileType, path: &Path) -> io::Result<Self> {
        if file_type.is_symlink() {
            Ok(Self::Symlink {
                target: fs::read_link(path)?,
            })
        } else if file_type.is_dir() {
            Ok(Self::Directory)
        } else {
            Ok(Self::File)
        }
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` for folders.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` for links, dangling or not.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }
}
