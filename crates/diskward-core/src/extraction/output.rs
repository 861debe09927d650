//! Filesystem helpers shared by the zip and tar extractors.

use crate::ArchiveError;
use crate::Result;
use crate::extraction::report::ExtractionReport;
use crate::security::TrustBoundary;
use crate::types::ValidatedPath;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;

/// Validates an entry name from an archive and returns where it should be
/// written.
///
/// Names containing NUL bytes are rejected outright; everything else,
/// including `..` and absolute names, is left to the boundary check so the
/// caller sees a single error kind for every escape.
pub(crate) fn entry_output(boundary: &TrustBoundary, name: &Path) -> Result<ValidatedPath> {
    let has_nul = name.as_os_str().as_encoded_bytes().contains(&0);
    let is_empty = name.components().all(|c| matches!(c, Component::CurDir));
    if has_nul || is_empty {
        return Err(ArchiveError::PathValidation {
            path: name.to_path_buf(),
            boundary: boundary.folders().to_vec(),
        });
    }
    boundary.check(name)
}

/// Creates the parent folders of `path`.
pub(crate) fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Removes whatever non-directory entry sits at `path` so a later entry
/// replaces it instead of writing through it.
pub(crate) fn clear_entry(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Ok(fs::remove_file(path)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Materializes a link entry at `output`.
///
/// On platforms without symbolic links the entry is counted as skipped.
#[cfg(unix)]
pub(crate) fn create_symlink(
    target: &Path,
    output: &Path,
    _name: &str,
    report: &mut ExtractionReport,
) -> Result<()> {
    std::os::unix::fs::symlink(target, output)?;
    report.symlinks_extracted += 1;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn create_symlink(
    _target: &Path,
    _output: &Path,
    name: &str,
    report: &mut ExtractionReport,
) -> Result<()> {
    tracing::debug!(entry = name, "symlink entry not materialized on this platform");
    report.entries_skipped += 1;
    report.add_warning(format!("Skipped symlink: {name}"));
    Ok(())
}

/// Maps an error raised while decoding entry content.
///
/// Truncated or malformed streams become `BadArchive`; anything else is an
/// environment failure.
pub(crate) fn content_error(archive: &Path, error: io::Error) -> ArchiveError {
    match error.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            ArchiveError::BadArchive {
                path: archive.to_path_buf(),
                reason: error.to_string(),
            }
        }
        _ => ArchiveError::Io(error),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn boundary(temp: &TempDir) -> TrustBoundary {
        TrustBoundary::new(temp.path(), &[] as &[PathBuf]).unwrap()
    }

    #[test]
    fn test_entry_output_inside() {
        let temp = TempDir::new().unwrap();
        let validated = entry_output(&boundary(&temp), Path::new("a/b.txt")).unwrap();
        assert_eq!(validated.relative().unwrap(), Path::new("a/b.txt"));
    }

    #[test]
    fn test_entry_output_rejects_escapes() {
        let temp = TempDir::new().unwrap();
        let boundary = boundary(&temp);

        for name in ["../evil.txt", "a/../../evil.txt", "/etc/passwd", ".", ""] {
            let result = entry_output(&boundary, Path::new(name));
            assert!(
                matches!(result, Err(ArchiveError::PathValidation { .. })),
                "{name} was accepted"
            );
        }
    }

    #[test]
    fn test_clear_entry() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        clear_entry(&file).unwrap();
        assert!(!file.exists());

        clear_entry(&file).unwrap();
        clear_entry(temp.path()).unwrap();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_content_error_classification() {
        let err = content_error(
            Path::new("a.tar.gz"),
            io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"),
        );
        assert!(matches!(err, ArchiveError::BadArchive { .. }));

        let err = content_error(Path::new("a.tar.gz"), io::Error::other("disk full"));
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
