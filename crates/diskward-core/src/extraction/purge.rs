//! Post-extraction link sweep.

use crate::Result;
use crate::extraction::report::ExtractionReport;
use crate::paths::real_path;
use crate::security::TrustBoundary;
use crate::walker::FolderWalker;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Removes symbolic links under `target_folder`.
///
/// With no boundary every link goes. With a boundary, a link is kept only
/// when it resolves inside it; links that cannot be resolved (dangling,
/// looping) are removed as well.
///
/// # Errors
///
/// Returns an error if the folder cannot be walked or a link cannot be
/// removed.
pub fn purge_links(
    target_folder: &Path,
    boundary: Option<&TrustBoundary>,
    report: &mut ExtractionReport,
) -> Result<()> {
    // Links are collected before any removal so the walk sees a stable tree.
    let mut links: Vec<PathBuf> = Vec::new();
    for entry in FolderWalker::new(target_folder).walk() {
        let entry = entry?;
        if entry.entry_type.is_symlink() {
            links.push(entry.path);
        }
    }

    for link in links {
        if let Some(boundary) = boundary
            && fs::metadata(&link).is_ok()
            && let Ok(resolved) = real_path(&link)
            && boundary.contains(&resolved)
        {
            continue;
        }

        remove_link(&link)?;
        tracing::warn!(path = %link.display(), "removed extracted symlink");
        report.symlinks_removed += 1;
        report.add_warning(format!("Removed symlink: {}", link.display()));
    }

    Ok(())
}

/// Removes a link; directory links on some platforms need `remove_dir`.
fn remove_link(link: &Path) -> Result<()> {
    match fs::remove_file(link) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(_) => Ok(fs::remove_dir(link)?),
    }
}
