//! Error types for archive and path operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while validating paths, writing archives or
/// reading archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path resolves outside every folder of the trust boundary.
    #[error("path resolves outside the trusted folders: {path} (allowed: {})", join_paths(.boundary))]
    PathValidation {
        /// The offending path, as given by the caller.
        path: PathBuf,
        /// The folders the path was checked against.
        boundary: Vec<PathBuf>,
    },

    /// A path is not a descendant of the folder it was made relative to.
    #[error("path {path} is not under {base}")]
    PathRelation {
        /// The path that was made relative.
        path: PathBuf,
        /// The base folder.
        base: PathBuf,
    },

    /// File name does not end in an extension the operation supports.
    #[error("{path} must end in {}", .expected.join(" or "))]
    FileExtension {
        /// The path with the unsupported extension.
        path: PathBuf,
        /// Extensions accepted by the operation.
        expected: Vec<&'static str>,
    },

    /// Archive container is structurally unreadable.
    #[error("unreadable archive {path}: {reason}")]
    BadArchive {
        /// The archive path.
        path: PathBuf,
        /// Diagnostic from the codec.
        reason: String,
    },

    /// An expected input path does not exist.
    #[error("path not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Exclusion pattern is not valid glob syntax.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Following symbolic links led back to an ancestor folder.
    #[error("filesystem loop: {path} points to ancestor {ancestor}")]
    FilesystemLoop {
        /// The entry that closes the loop.
        path: PathBuf,
        /// The ancestor it points back to.
        ancestor: PathBuf,
    },
}

impl ArchiveError {
    /// Returns `true` if this error was caused by the caller's input rather
    /// than by the environment.
    ///
    /// Validation errors are never worth retrying: the same input will be
    /// rejected again.
    ///
    /// # Examples
    ///
    /// ```
    /// use diskward_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::PathValidation {
    ///     path: PathBuf::from("link"),
    ///     boundary: vec![PathBuf::from("/srv/data")],
    /// };
    /// assert!(err.is_validation_error());
    ///
    /// let err = ArchiveError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::PathValidation { .. }
                | Self::PathRelation { .. }
                | Self::FileExtension { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns `true` if this error came from the filesystem or the codec
    /// streams rather than from validation.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::NotFound { .. } | Self::FilesystemLoop { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use diskward_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::BadArchive {
    ///     path: PathBuf::from("a.zip"),
    ///     reason: "invalid Zip archive".to_string(),
    /// };
    /// assert_eq!(err.context(), Some("invalid Zip archive"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::BadArchive { reason, .. } | Self::InvalidPattern { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
