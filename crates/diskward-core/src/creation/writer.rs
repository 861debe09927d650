//! Folder-to-archive orchestration and the fluent [`ArchiveWriter`].
//!
//! The archive is written to a hidden staging file next to the target and
//! renamed over the target only after the container is complete. A failed
//! write never leaves a target file behind.

use crate::ArchiveError;
use crate::Result;
use crate::creation::compression::compressed_writer;
use crate::creation::config::CreationConfig;
use crate::creation::config::LinkPolicy;
use crate::creation::filters::PlannedEntry;
use crate::creation::filters::plan_entries;
use crate::creation::report::CreationReport;
use crate::creation::tar::write_tar_entries;
use crate::creation::zip::write_zip_entries;
use crate::formats::ARCHIVE_EXTENSIONS;
use crate::formats::ArchiveType;
use crate::formats::TAR_EXTENSIONS;
use crate::formats::ZIP_EXTENSIONS;
use crate::formats::detect::append_extension;
use crate::formats::detect_in;
use crate::security::validator::resolve_lenient;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Which extensions a write operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetFamily {
    /// Any supported archive; defaults to zip.
    Any,
    /// Zip only.
    Zip,
    /// Tar family only; defaults to gzip.
    Tar,
}

impl TargetFamily {
    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Any => ARCHIVE_EXTENSIONS,
            Self::Zip => ZIP_EXTENSIONS,
            Self::Tar => TAR_EXTENSIONS,
        }
    }

    const fn default_extension(self) -> &'static str {
        match self {
            Self::Any | Self::Zip => ".zip",
            Self::Tar => ".tar.gz",
        }
    }
}

/// Archives the folder `source` into `target`.
pub(crate) fn write_folder(
    source: &Path,
    target: Option<&Path>,
    config: &CreationConfig,
    family: TargetFamily,
) -> Result<CreationReport> {
    let start = Instant::now();
    config.validate()?;

    let source: PathBuf = source.components().collect();
    let metadata = fs::metadata(&source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArchiveError::NotFound {
            path: source.clone(),
        },
        _ => ArchiveError::Io(e),
    })?;
    if !metadata.is_dir() {
        return Err(ArchiveError::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("source is not a folder: {}", source.display()),
        )));
    }

    let (target, format) = resolve_target(&source, target, config.format, family)?;
    let mut staging = staging_file(&target)?;

    let ignored = [resolve_lenient(&target)?, resolve_lenient(staging.path())?];
    let plan = plan_entries(&source, config, &ignored)?;

    let mut report = CreationReport {
        entries_skipped: plan.skipped,
        warnings: plan.warnings,
        ..CreationReport::default()
    };
    write_container(staging.as_file_mut(), format, &plan.entries, config, &mut report)?;
    staging.as_file().sync_all()?;
    report.archive_size = staging.as_file().metadata()?.len();

    staging.persist(&target).map_err(|e| ArchiveError::Io(e.error))?;

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        entries = report.total_entries(),
        skipped = report.entries_skipped,
        "archive written"
    );

    report.archive_path = target;
    report.duration = start.elapsed();
    Ok(report)
}

/// Picks the target path and the format to write.
///
/// An explicit format wins over the target extension but must belong to
/// `family`.
fn resolve_target(
    source: &Path,
    target: Option<&Path>,
    format: Option<ArchiveType>,
    family: TargetFamily,
) -> Result<(PathBuf, ArchiveType)> {
    let extensions = family.extensions();

    if let Some(format) = format {
        let target = target.map_or_else(
            || append_extension(source, format.extension()),
            Path::to_path_buf,
        );
        if !extensions.contains(&format.extension()) {
            return Err(ArchiveError::FileExtension {
                path: target,
                expected: extensions.to_vec(),
            });
        }
        return Ok((target, format));
    }

    let target = target.map_or_else(
        || append_extension(source, family.default_extension()),
        Path::to_path_buf,
    );
    let format = detect_in(&target, extensions)?;
    Ok((target, format))
}

fn staging_file(target: &Path) -> Result<tempfile::NamedTempFile> {
    let folder = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned());

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".partial")
        .tempfile_in(folder)?;
    Ok(staging)
}

fn write_container(
    file: &mut File,
    format: ArchiveType,
    entries: &[PlannedEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()> {
    let mut output = BufWriter::new(file);

    match (format, format.codec()) {
        (ArchiveType::Zip, _) => {
            write_zip_entries(&mut output, entries, config, report)?;
        }
        (_, None) => {
            write_tar_entries(&mut output, entries, config, report)?;
        }
        (_, Some(codec)) => {
            let encoder = compressed_writer(codec, config.compression_level, &mut output);
            write_tar_entries(encoder, entries, config, report)?.finish()?;
        }
    }

    output.flush()?;
    Ok(())
}

/// Builder for archiving a folder with a fluent API.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::ArchiveWriter;
/// use diskward_core::LinkPolicy;
///
/// let report = ArchiveWriter::new("project")
///     .target("project.tar.xz")
///     .link_policy(LinkPolicy::Validate)
///     .exclude_name(".git")
///     .exclude_path("target/*")
///     .compression_level(9)
///     .write()?;
///
/// println!("Stored {} files", report.files_added);
/// # Ok::<(), diskward_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    source: PathBuf,
    target: Option<PathBuf>,
    config: CreationConfig,
}

impl ArchiveWriter {
    /// Creates a writer for the folder `source` with default settings.
    #[must_use]
    pub fn new<P: AsRef<Path>>(source: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: None,
            config: CreationConfig::default(),
        }
    }

    /// Sets the archive path. Without it the archive is written next to the
    /// source as `<source>.zip`, or with the extension of an explicit
    /// [`format`](Self::format).
    #[must_use]
    pub fn target<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: CreationConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the link policy.
    #[must_use]
    pub const fn link_policy(mut self, policy: LinkPolicy) -> Self {
        self.config.link_policy = policy;
        self
    }

    /// Adds a folder that links may point into.
    #[must_use]
    pub fn trusted_folder<P: AsRef<Path>>(mut self, folder: P) -> Self {
        self.config.trusted_folders.push(folder.as_ref().to_path_buf());
        self
    }

    /// Adds a glob matched against bare entry names.
    #[must_use]
    pub fn exclude_name<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.excluded_names.push(pattern.into());
        self
    }

    /// Adds a glob matched against entry paths relative to the source.
    #[must_use]
    pub fn exclude_path<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.excluded_paths.push(pattern.into());
        self
    }

    /// Sets the compression level (1-9).
    #[must_use]
    pub const fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Sets whether file modes and times are stored.
    #[must_use]
    pub const fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.config.preserve_permissions = preserve;
        self
    }

    /// Sets an explicit format instead of detecting it from the target.
    #[must_use]
    pub const fn format(mut self, format: ArchiveType) -> Self {
        self.config.format = Some(format);
        self
    }

    /// Writes the archive.
    ///
    /// # Errors
    ///
    /// Same as [`crate::write_archive`].
    pub fn write(self) -> Result<CreationReport> {
        crate::api::write_archive(&self.source, self.target.as_deref(), &self.config)
    }
}
