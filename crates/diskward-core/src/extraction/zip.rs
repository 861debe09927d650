//! ZIP extraction.

use crate::ArchiveError;
use crate::Result;
use crate::extraction::output::clear_entry;
use crate::extraction::output::content_error;
use crate::extraction::output::create_parent;
use crate::extraction::output::create_symlink;
use crate::extraction::output::entry_output;
use crate::extraction::report::ExtractionReport;
use crate::security::TrustBoundary;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Extracts every entry of the zip archive at `archive_path` into the base
/// folder of `boundary`.
///
/// # Errors
///
/// - `ArchiveError::BadArchive` if the central directory or an entry is
///   corrupt
/// - `ArchiveError::PathValidation` if an entry would land outside the
///   boundary
/// - `ArchiveError::Io` if writing fails
pub fn extract_zip(
    archive_path: &Path,
    boundary: &TrustBoundary,
    report: &mut ExtractionReport,
) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| zip_error(archive_path, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| zip_error(archive_path, e))?;
        let name = entry.name().to_string();
        let output = entry_output(boundary, Path::new(&name))?;
        let output = output.as_path();

        if entry.is_dir() {
            fs::create_dir_all(output)?;
            report.directories_created += 1;
            continue;
        }

        create_parent(output)?;
        clear_entry(output)?;

        if entry.is_symlink() {
            let mut target = String::new();
            entry
                .read_to_string(&mut target)
                .map_err(|e| content_error(archive_path, e))?;
            create_symlink(Path::new(&target), output, &name, report)?;
            continue;
        }

        let mut writer = BufWriter::new(File::create(output)?);
        let written = io::copy(&mut entry, &mut writer).map_err(|e| content_error(archive_path, e))?;
        writer.flush()?;
        drop(writer);

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            // setuid, setgid and sticky bits from an untrusted archive are dropped
            fs::set_permissions(output, fs::Permissions::from_mode(mode & 0o777))?;
        }

        report.files_extracted += 1;
        report.bytes_written += written;
    }

    Ok(())
}

fn zip_error(archive_path: &Path, error: ZipError) -> ArchiveError {
    match error {
        ZipError::Io(e) => content_error(archive_path, e),
        other => ArchiveError::BadArchive {
            path: archive_path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
