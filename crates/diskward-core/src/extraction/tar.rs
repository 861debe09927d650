//! TAR extraction, with gzip, bzip2 or xz decompression layered underneath.

use crate::ArchiveError;
use crate::Result;
use crate::extraction::output::clear_entry;
use crate::extraction::output::content_error;
use crate::extraction::output::create_parent;
use crate::extraction::output::create_symlink;
use crate::extraction::output::entry_output;
use crate::extraction::report::ExtractionReport;
use crate::formats::CompressionCodec;
use crate::security::TrustBoundary;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use tar::Archive;
use tar::EntryType;

/// Extracts every entry of the tar archive at `archive_path` into the base
/// folder of `boundary`.
///
/// Hard links, device nodes and FIFOs are not materialized; each one is
/// counted in `entries_skipped` with a warning.
///
/// # Errors
///
/// - `ArchiveError::BadArchive` if a header or the compressed stream is
///   corrupt
/// - `ArchiveError::PathValidation` if an entry would land outside the
///   boundary
/// - `ArchiveError::Io` if writing fails
pub fn extract_tar(
    archive_path: &Path,
    codec: Option<CompressionCodec>,
    boundary: &TrustBoundary,
    report: &mut ExtractionReport,
) -> Result<()> {
    let reader = BufReader::new(File::open(archive_path)?);
    let reader: Box<dyn Read> = match codec {
        Some(codec) => codec.decoder(reader),
        None => Box::new(reader),
    };

    let mut archive = Archive::new(reader);
    archive.set_preserve_mtime(true);
    archive.set_overwrite(true);

    let entries = archive.entries().map_err(|e| bad_archive(archive_path, &e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| bad_archive(archive_path, &e))?;
        let name = entry
            .path()
            .map_err(|e| bad_archive(archive_path, &e))?
            .into_owned();
        let display_name = name.display().to_string();
        let kind = entry.header().entry_type();

        let output = entry_output(boundary, &name)?;
        let output = output.as_path();

        match kind {
            EntryType::Directory => {
                fs::create_dir_all(output)?;
                report.directories_created += 1;
            }
            EntryType::Regular | EntryType::Continuous => {
                create_parent(output)?;
                clear_entry(output)?;
                let size = entry.size();
                entry
                    .unpack(output)
                    .map_err(|e| content_error(archive_path, e))?;
                report.files_extracted += 1;
                report.bytes_written += size;
            }
            EntryType::Symlink => {
                let Some(target) = entry
                    .link_name()
                    .map_err(|e| bad_archive(archive_path, &e))?
                else {
                    return Err(ArchiveError::BadArchive {
                        path: archive_path.to_path_buf(),
                        reason: format!("symlink entry without target: {display_name}"),
                    });
                };
                create_parent(output)?;
                clear_entry(output)?;
                create_symlink(&target, output, &display_name, report)?;
            }
            other => {
                tracing::debug!(entry = %display_name, kind = ?other, "skipping unsupported tar entry");
                report.entries_skipped += 1;
                report.add_warning(format!("Skipped {}: {display_name}", kind_label(other)));
            }
        }
    }

    Ok(())
}

fn kind_label(kind: EntryType) -> &'static str {
    match kind {
        EntryType::Link => "hardlink",
        EntryType::Char | EntryType::Block => "device",
        EntryType::Fifo => "fifo",
        _ => "unsupported entry",
    }
}

fn bad_archive(archive_path: &Path, error: &std::io::Error) -> ArchiveError {
    ArchiveError::BadArchive {
        path: archive_path.to_path_buf(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn extract(bytes: &[u8], codec: Option<CompressionCodec>) -> (TempDir, Result<ExtractionReport>) {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("in.tar");
        fs::write(&archive, bytes).unwrap();
        let target = temp.path().join("out");
        fs::create_dir(&target).unwrap();

        let boundary = TrustBoundary::new(&target, &[] as &[PathBuf]).unwrap();
        let mut report = ExtractionReport::default();
        let result = extract_tar(&archive, codec, &boundary, &mut report).map(|()| report);
        (temp, result)
    }

    #[test]
    fn test_extract_tar_files_and_directories() {
        let bytes = TarTestBuilder::new()
            .add_directory("docs/")
            .add_file("docs/readme.txt", b"hello")
            .add_file("top.txt", b"top")
            .build();

        let (temp, result) = extract(&bytes, None);
        let report = result.unwrap();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.bytes_written, 8);
        assert_eq!(
            fs::read_to_string(temp.path().join("out/docs/readme.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_extract_tar_gz() {
        let bytes = TarTestBuilder::new().add_file("a.txt", b"alpha").build();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&bytes).unwrap();
        let compressed = encoder.finish().unwrap();

        let (temp, result) = extract(&compressed, Some(CompressionCodec::Gzip));
        result.unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("out/a.txt")).unwrap(), "alpha");
    }

    #[test]
    fn test_extract_tar_gz_corrupt_stream() {
        let (_temp, result) = extract(b"definitely not gzip", Some(CompressionCodec::Gzip));
        assert!(matches!(result, Err(ArchiveError::BadArchive { .. })));
    }

    #[test]
    fn test_extract_tar_traversal_rejected() {
        let bytes = TarTestBuilder::new()
            .add_raw_file("../evil.txt", b"evil")
            .build();

        let (temp, result) = extract(&bytes, None);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
        assert!(!temp.path().join("evil.txt").exists());
    }

    #[test]
    fn test_extract_tar_hardlink_skipped() {
        let bytes = TarTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_hardlink("b.txt", "a.txt")
            .build();

        let (temp, result) = extract(&bytes, None);
        let report = result.unwrap();
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.warnings, ["Skipped hardlink: b.txt"]);
        assert!(!temp.path().join("out/b.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_tar_symlink_entry() {
        let bytes = TarTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_symlink("link", "a.txt")
            .build();

        let (temp, result) = extract(&bytes, None);
        assert_eq!(result.unwrap().symlinks_extracted, 1);
        assert_eq!(
            fs::read_link(temp.path().join("out/link")).unwrap(),
            Path::new("a.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_tar_write_through_link_rejected() {
        let bytes = TarTestBuilder::new()
            .add_symlink("escape", "/tmp")
            .add_file("escape/diskward-tar-through-link.txt", b"evil")
            .build();

        let (_temp, result) = extract(&bytes, None);
        assert!(matches!(result, Err(ArchiveError::PathValidation { .. })));
        assert!(!Path::new("/tmp/diskward-tar-through-link.txt").exists());
    }
}
