//! TAR container writing.
//!
//! The container is written to any `Write`; compression is layered
//! underneath by the caller (see
//! [`compressed_writer`](crate::creation::compression::compressed_writer)).

use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::filters::PlannedEntry;
use crate::creation::report::CreationReport;
use crate::types::EntryType;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tar::Builder;
use tar::Header;

const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIRECTORY_MODE: u32 = 0o755;

/// Writes `entries` into a TAR container on `writer` and returns the writer
/// once the end-of-archive blocks are written.
///
/// # Errors
///
/// Returns an I/O error if a source file cannot be read or the container
/// cannot be written.
pub fn write_tar_entries<W: Write>(
    writer: W,
    entries: &[PlannedEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<W> {
    let mut builder = Builder::new(writer);

    for entry in entries {
        match &entry.entry_type {
            EntryType::File => add_file_to_tar(&mut builder, entry, config, report)?,
            EntryType::Directory => add_directory_to_tar(&mut builder, entry, config, report)?,
            EntryType::Symlink { target } => {
                add_symlink_to_tar(&mut builder, &entry.name, target)?;
                report.symlinks_added += 1;
            }
        }
    }

    builder.finish()?;
    let mut writer = builder.into_inner()?;
    writer.flush()?;
    Ok(writer)
}

fn add_file_to_tar<W: Write>(
    builder: &mut Builder<W>,
    entry: &PlannedEntry,
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()> {
    let mut file = File::open(&entry.source)?;
    let metadata = file.metadata()?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    header.set_mode(DEFAULT_FILE_MODE);
    if config.preserve_permissions {
        set_permissions(&mut header, &metadata);
    }

    builder.append_data(&mut header, &entry.name, &mut file)?;

    report.files_added += 1;
    report.bytes_written += size;
    Ok(())
}

fn add_directory_to_tar<W: Write>(
    builder: &mut Builder<W>,
    entry: &PlannedEntry,
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(DEFAULT_DIRECTORY_MODE);
    if config.preserve_permissions {
        let metadata = std::fs::metadata(&entry.source)?;
        set_permissions(&mut header, &metadata);
    }

    builder.append_data(&mut header, format!("{}/", entry.name), std::io::empty())?;

    report.directories_added += 1;
    Ok(())
}

fn add_symlink_to_tar<W: Write>(builder: &mut Builder<W>, name: &str, target: &Path) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);

    builder.append_link(&mut header, name, target)?;
    Ok(())
}

/// Sets file mode and modification time in a TAR header from metadata.
#[cfg(unix)]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode() & 0o7777);
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)] // Intentional: clamped to non-negative
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    if metadata.permissions().readonly() {
        header.set_mode(0o444);
    }
    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}
