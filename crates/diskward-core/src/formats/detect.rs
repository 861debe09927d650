//! Archive format detection from file names.
//!
//! The file name is the only format selector: nothing here looks at archive
//! content. Compound extensions are matched as a unit, longest first, so
//! `backup.tar.gz` is a gzip tar and never a plain gzip stream.

use crate::ArchiveError;
use crate::Result;
use crate::formats::compression::CompressionCodec;
use crate::paths::matching_extension;
use std::path::Path;
use std::path::PathBuf;

/// Extensions handled by the zip codec.
pub const ZIP_EXTENSIONS: &[&str] = &[".zip"];

/// Extensions handled by the tar codec.
pub const TAR_EXTENSIONS: &[&str] = &[".tar.gz", ".tar.bz2", ".tar.xz", ".tar"];

/// Every supported archive extension.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".tar.gz", ".tar.bz2", ".tar.xz", ".tar"];

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveType {
    /// ZIP archive with deflate compression.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Bzip2-compressed tar archive.
    TarBz2,
    /// XZ-compressed tar archive.
    TarXz,
}

impl ArchiveType {
    /// Returns the canonical file extension, including the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use diskward_core::formats::ArchiveType;
    ///
    /// assert_eq!(ArchiveType::Zip.extension(), ".zip");
    /// assert_eq!(ArchiveType::TarGz.extension(), ".tar.gz");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tar => ".tar",
            Self::TarGz => ".tar.gz",
            Self::TarBz2 => ".tar.bz2",
            Self::TarXz => ".tar.xz",
        }
    }

    /// Returns `true` for the tar family.
    #[must_use]
    pub const fn is_tar(self) -> bool {
        !matches!(self, Self::Zip)
    }

    /// Returns the stream codec wrapped around a tar container, if any.
    #[must_use]
    pub const fn codec(self) -> Option<CompressionCodec> {
        match self {
            Self::TarGz => Some(CompressionCodec::Gzip),
            Self::TarBz2 => Some(CompressionCodec::Bzip2),
            Self::TarXz => Some(CompressionCodec::Xz),
            Self::Zip | Self::Tar => None,
        }
    }

    /// Maps an extension from [`ARCHIVE_EXTENSIONS`] to its format.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            ".zip" => Some(Self::Zip),
            ".tar" => Some(Self::Tar),
            ".tar.gz" => Some(Self::TarGz),
            ".tar.bz2" => Some(Self::TarBz2),
            ".tar.xz" => Some(Self::TarXz),
            _ => None,
        }
    }
}

/// Detects the archive type from a file path.
///
/// # Errors
///
/// Returns `ArchiveError::FileExtension` if the name does not end in one of
/// [`ARCHIVE_EXTENSIONS`].
///
/// # Examples
///
/// ```
/// use diskward_core::formats::ArchiveType;
/// use diskward_core::formats::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("a.tar.gz")).unwrap(), ArchiveType::TarGz);
/// assert!(detect_format(Path::new("a.rar")).is_err());
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    detect_in(path, ARCHIVE_EXTENSIONS)
}

/// Detects the archive type, accepting only the given extension set.
///
/// # Errors
///
/// Returns `ArchiveError::FileExtension` listing `extensions` when the name
/// ends in none of them.
pub fn detect_in(path: &Path, extensions: &[&'static str]) -> Result<ArchiveType> {
    matching_extension(path, extensions)
        .and_then(ArchiveType::from_extension)
        .ok_or_else(|| ArchiveError::FileExtension {
            path: path.to_path_buf(),
            expected: extensions.to_vec(),
        })
}

/// Returns `path` with its archive extension removed, or `None` if it has
/// none.
///
/// # Examples
///
/// ```
/// use diskward_core::formats::strip_archive_extension;
/// use std::path::Path;
///
/// assert_eq!(
///     strip_archive_extension(Path::new("/srv/backup.tar.gz")).unwrap(),
///     Path::new("/srv/backup")
/// );
/// assert!(strip_archive_extension(Path::new("/srv/notes.txt")).is_none());
/// ```
#[must_use]
pub fn strip_archive_extension(path: &Path) -> Option<PathBuf> {
    let extension = matching_extension(path, ARCHIVE_EXTENSIONS)?;
    let name = path.file_name()?.to_str()?;
    let stem = &name[..name.len() - extension.len()];
    Some(path.with_file_name(stem))
}

/// Returns `path` with `extension` appended to its file name.
pub(crate) fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(extension);
    PathBuf::from(name)
}
