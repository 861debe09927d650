//! Archive extraction reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive extraction operation.
///
/// # Examples
///
/// ```
/// use diskward_core::extraction::ExtractionReport;
///
/// let mut report = ExtractionReport::default();
/// report.files_extracted = 2;
/// report.directories_created = 1;
/// assert_eq!(report.total_items(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Folder the archive was extracted into.
    pub target_folder: PathBuf,

    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Number of links materialized from the archive.
    pub symlinks_extracted: usize,

    /// Number of links removed by the post-extraction sweep.
    pub symlinks_removed: usize,

    /// Number of archive entries not materialized (unsupported types).
    pub entries_skipped: usize,

    /// Total file content bytes written.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
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

    /// Returns files plus directories extracted.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns the number of extracted links still present after the sweep.
    #[must_use]
    pub const fn symlinks_kept(&self) -> usize {
        self.symlinks_extracted.saturating_sub(self.symlinks_removed)
    }
}
