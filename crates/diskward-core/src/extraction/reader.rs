//! Archive-to-folder orchestration and the fluent [`ArchiveReader`].

use crate::ArchiveError;
use crate::Result;
use crate::extraction::atomic::atomic_extract;
use crate::extraction::config::ExtractionConfig;
use crate::extraction::purge::purge_links;
use crate::extraction::report::ExtractionReport;
use crate::extraction::tar::extract_tar;
use crate::extraction::zip::extract_zip;
use crate::formats::ARCHIVE_EXTENSIONS;
use crate::formats::ArchiveType;
use crate::formats::detect_format;
use crate::formats::strip_archive_extension;
use crate::security::TrustBoundary;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Extracts the archive `source` into `target`.
pub(crate) fn read_folder(
    source: &Path,
    target: Option<&Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let start = Instant::now();

    let metadata = fs::metadata(source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArchiveError::NotFound {
            path: source.to_path_buf(),
        },
        _ => ArchiveError::Io(e),
    })?;
    if metadata.is_dir() {
        return Err(ArchiveError::Io(io::Error::new(
            io::ErrorKind::IsADirectory,
            format!("source is a folder: {}", source.display()),
        )));
    }

    let format = detect_format(source)?;
    let target = match target {
        Some(target) => target.to_path_buf(),
        None => default_target(source)?,
    };

    let mut report = atomic_extract(&target, |folder| {
        let mut report = ExtractionReport::default();
        let boundary = TrustBoundary::new(folder, &[] as &[PathBuf])?;

        let extracted = match format {
            ArchiveType::Zip => extract_zip(source, &boundary, &mut report),
            tar_format => extract_tar(source, tar_format.codec(), &boundary, &mut report),
        };
        if let Err(e) = extracted {
            // Links written before the failing entry must not outlive the error
            if let Err(purge) = purge_links(folder, None, &mut report) {
                tracing::warn!(
                    path = %folder.display(),
                    error = %purge,
                    "failed to remove links after a failed extraction"
                );
            }
            return Err(e);
        }

        if config.purge_all_links {
            purge_links(folder, None, &mut report)?;
        } else {
            let boundary = TrustBoundary::new(folder, config.trusted_folders.as_slice())?;
            purge_links(folder, Some(&boundary), &mut report)?;
        }
        Ok(report)
    })?;

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        files = report.files_extracted,
        links_removed = report.symlinks_removed,
        "archive extracted"
    );

    report.target_folder = target;
    report.duration = start.elapsed();
    Ok(report)
}

fn default_target(source: &Path) -> Result<PathBuf> {
    strip_archive_extension(source)
        .filter(|stripped| stripped.file_name().is_some())
        .ok_or_else(|| ArchiveError::FileExtension {
            path: source.to_path_buf(),
            expected: ARCHIVE_EXTENSIONS.to_vec(),
        })
}

/// Builder for extracting an archive with a fluent API.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::ArchiveReader;
///
/// let report = ArchiveReader::new("bundle.tar.gz")
///     .target("bundle")
///     .purge_all_links(false)
///     .trusted_folder("/srv/shared")
///     .read()?;
///
/// println!("Extracted {} files", report.files_extracted);
/// # Ok::<(), diskward_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    source: PathBuf,
    target: Option<PathBuf>,
    config: ExtractionConfig,
}

impl ArchiveReader {
    /// Creates a reader for the archive `source` with default settings.
    #[must_use]
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: None,
            config: ExtractionConfig::default(),
        }
    }

    /// Sets the target folder. Without it the archive is extracted next to
    /// the source, into a folder named after it minus the extension.
    #[must_use]
    pub fn target<P: AsRef<Path>>(mut self, folder: P) -> Self {
        self.target = Some(folder.as_ref().to_path_buf());
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets whether every extracted link is removed.
    #[must_use]
    pub const fn purge_all_links(mut self, purge: bool) -> Self {
        self.config.purge_all_links = purge;
        self
    }

    /// Adds a folder that kept links may point into.
    #[must_use]
    pub fn trusted_folder<P: AsRef<Path>>(mut self, folder: P) -> Self {
        self.config.trusted_folders.push(folder.as_ref().to_path_buf());
        self
    }

    /// Extracts the archive.
    ///
    /// # Errors
    ///
    /// Same as [`crate::read_archive`].
    pub fn read(self) -> Result<ExtractionReport> {
        crate::api::read_archive(&self.source, self.target.as_deref(), &self.config)
    }
}
