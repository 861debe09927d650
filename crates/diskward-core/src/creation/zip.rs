//! ZIP container writing.

use crate::Result;
use crate::creation::compression::compression_level_to_zip;
use crate::creation::config::CreationConfig;
use crate::creation::filters::PlannedEntry;
use crate::creation::report::CreationReport;
use crate::types::EntryType;
use std::fs::File;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes `entries` into a ZIP container on `writer` and returns the writer
/// once the central directory is written.
///
/// # Errors
///
/// Returns an I/O error if a source file cannot be read or the container
/// cannot be written.
pub fn write_zip_entries<W: Write + Seek>(
    writer: W,
    entries: &[PlannedEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level_to_zip(config.compression_level)));

    for entry in entries {
        match &entry.entry_type {
            EntryType::File => add_file_to_zip(&mut zip, entry, config, report, options)?,
            EntryType::Directory => {
                // ZIP requires explicit directory entries with trailing /
                let dir_name = format!("{}/", entry.name);
                let dir_options = directory_options(&entry.source, config, options);
                zip.add_directory(&dir_name, dir_options)
                    .map_err(|e| std::io::Error::other(format!("failed to add directory: {e}")))?;
                report.directories_added += 1;
            }
            EntryType::Symlink { target } => {
                zip.add_symlink(&entry.name, target.to_string_lossy(), options)
                    .map_err(|e| std::io::Error::other(format!("failed to add symlink: {e}")))?;
                report.symlinks_added += 1;
            }
        }
    }

    let writer = zip
        .finish()
        .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;
    Ok(writer)
}

fn add_file_to_zip<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &PlannedEntry,
    config: &CreationConfig,
    report: &mut CreationReport,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut file = File::open(&entry.source)?;
    let metadata = file.metadata()?;

    let options = options.large_file(needs_zip64(metadata.len()));
    let file_options = if config.preserve_permissions {
        with_metadata(options, &metadata)
    } else {
        options
    };

    zip.start_file(&entry.name, file_options)
        .map_err(|e| std::io::Error::other(format!("failed to start file in ZIP: {e}")))?;
    let copied = std::io::copy(&mut file, zip)?;

    report.files_added += 1;
    report.bytes_written += copied;
    Ok(())
}

/// Entries of 4 GiB or more need the ZIP64 extension.
fn needs_zip64(len: u64) -> bool {
    len >= u64::from(u32::MAX)
}

fn directory_options(
    source: &Path,
    config: &CreationConfig,
    options: SimpleFileOptions,
) -> SimpleFileOptions {
    if !config.preserve_permissions {
        return options;
    }
    std::fs::metadata(source).map_or(options, |metadata| with_metadata(options, &metadata))
}

#[cfg(unix)]
fn with_metadata(options: SimpleFileOptions, metadata: &std::fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_metadata(options: SimpleFileOptions, _metadata: &std::fs::Metadata) -> SimpleFileOptions {
    options
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Read;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn planned(source: PathBuf, name: &str, entry_type: EntryType) -> PlannedEntry {
        PlannedEntry {
            source,
            name: name.to_string(),
            entry_type,
        }
    }

    #[test]
    fn test_write_zip_entries() {
        let temp = TempDir::new().unwrap();
        fs_write(&temp.path().join("a.txt"), "hello");
        std::fs::create_dir(temp.path().join("dir")).unwrap();

        let entries = vec![
            planned(temp.path().join("a.txt"), "a.txt", EntryType::File),
            planned(temp.path().join("dir"), "dir", EntryType::Directory),
        ];
        let mut report = CreationReport::default();
        let cursor = write_zip_entries(
            Cursor::new(Vec::new()),
            &entries,
            &CreationConfig::default(),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.files_added, 1);
        assert_eq!(report.directories_added, 1);
        assert_eq!(report.bytes_written, 5);

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello");
        assert!(archive.by_name("dir/").unwrap().is_dir());
    }

    #[test]
    fn test_write_zip_symlink_entry() {
        let entries = vec![planned(
            PathBuf::from("unused"),
            "link",
            EntryType::Symlink {
                target: PathBuf::from("a.txt"),
            },
        )];
        let mut report = CreationReport::default();
        let cursor = write_zip_entries(
            Cursor::new(Vec::new()),
            &entries,
            &CreationConfig::default(),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.symlinks_added, 1);
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert!(archive.by_index(0).unwrap().is_symlink());
    }

    #[test]
    fn test_needs_zip64_from_four_gib() {
        assert!(!needs_zip64(0));
        assert!(!needs_zip64(u64::from(u32::MAX) - 1));
        assert!(needs_zip64(u64::from(u32::MAX)));
        assert!(needs_zip64(8 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_write_zip_missing_source() {
        let entries = vec![planned(PathBuf::from("/nonexistent/a.txt"), "a.txt", EntryType::File)];
        let mut report = CreationReport::default();
        let result = write_zip_entries(
            Cursor::new(Vec::new()),
            &entries,
            &CreationConfig::default(),
            &mut report,
        );
        assert!(result.is_err());
    }

    fn fs_write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }
}
