//! High-level public API for archive creation and extraction.

use std::path::Path;

use crate::Result;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::creation::writer::TargetFamily;
use crate::creation::writer::write_folder;
use crate::extraction::ExtractionConfig;
use crate::extraction::ExtractionReport;
use crate::extraction::reader::read_folder;

/// Archives the folder `source` into `target`.
///
/// The format follows the target extension (any of
/// [`ARCHIVE_EXTENSIONS`](crate::ARCHIVE_EXTENSIONS)) unless
/// `config.format` is set. Without a target the archive is written next to
/// the source as `<source>.zip`.
///
/// Symbolic links are handled per `config.link_policy`; by default they are
/// left out entirely.
///
/// # Errors
///
/// - `ArchiveError::NotFound` if `source` does not exist
/// - `ArchiveError::FileExtension` if the target extension is unsupported;
///   no file is created
/// - `ArchiveError::InvalidCompressionLevel` or
///   `ArchiveError::InvalidPattern` for an invalid configuration
/// - `ArchiveError::Io` if reading the source or writing the target fails
///
/// # Examples
///
/// ```no_run
/// use diskward_core::CreationConfig;
/// use diskward_core::write_archive;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CreationConfig::default().with_excluded_names(vec![".git".into()]);
/// let report = write_archive("project", Some(Path::new("project.tar.gz")), &config)?;
/// println!("Stored {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn write_archive<P: AsRef<Path>>(
    source: P,
    target: Option<&Path>,
    config: &CreationConfig,
) -> Result<CreationReport> {
    write_folder(source.as_ref(), target, config, TargetFamily::Any)
}

/// Archives the folder `source` as a zip file.
///
/// Same as [`write_archive`] but only `.zip` targets are accepted.
///
/// # Errors
///
/// Same as [`write_archive`].
pub fn write_zip<P: AsRef<Path>>(
    source: P,
    target: Option<&Path>,
    config: &CreationConfig,
) -> Result<CreationReport> {
    write_folder(source.as_ref(), target, config, TargetFamily::Zip)
}

/// Archives the folder `source` as a tar file, gzip-compressed unless the
/// target says otherwise.
///
/// Same as [`write_archive`] but only tar targets are accepted, and the
/// default target is `<source>.tar.gz`.
///
/// # Errors
///
/// Same as [`write_archive`].
pub fn write_tar<P: AsRef<Path>>(
    source: P,
    target: Option<&Path>,
    config: &CreationConfig,
) -> Result<CreationReport> {
    write_folder(source.as_ref(), target, config, TargetFamily::Tar)
}

/// Extracts the archive `source` into `target`.
///
/// Without a target the archive is extracted next to the source, into a
/// folder named after it without the archive extension. Every extracted
/// symbolic link is removed afterwards unless `config.purge_all_links` is
/// `false`, in which case only links resolving outside the target folder
/// and `config.trusted_folders` are removed.
///
/// # Errors
///
/// - `ArchiveError::NotFound` if `source` does not exist
/// - `ArchiveError::FileExtension` if the extension is unsupported
/// - `ArchiveError::BadArchive` if the container is corrupt
/// - `ArchiveError::PathValidation` if an entry would be written outside the
///   target folder
/// - `ArchiveError::Io` if writing fails
///
/// On error a target folder created by this call is removed again.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::ExtractionConfig;
/// use diskward_core::read_archive;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = read_archive("bundle.zip", Some(Path::new("/tmp/bundle")), &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn read_archive<P: AsRef<Path>>(
    source: P,
    target: Option<&Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    read_folder(source.as_ref(), target, config)
}
