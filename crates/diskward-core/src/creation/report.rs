//! Archive creation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use diskward_core::creation::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.bytes_written = 1000;
/// report.archive_size = 250;
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Path of the finished archive.
    pub archive_path: PathBuf,

    /// Number of regular files stored.
    pub files_added: usize,

    /// Number of directory entries stored.
    pub directories_added: usize,

    /// Number of links stored as links.
    pub symlinks_added: usize,

    /// Number of walked entries left out (excluded, rejected or looping).
    /// A pruned directory counts once, whatever its content.
    pub entries_skipped: usize,

    /// Total file content bytes read into the archive (uncompressed).
    pub bytes_written: u64,

    /// Size of the finished archive file.
    pub archive_size: u64,

    /// Duration of the creation operation.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates a new empty creation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the total number of entries stored.
    #[must_use]
    pub const fn total_entries(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.archive_size as f64
    }
}
