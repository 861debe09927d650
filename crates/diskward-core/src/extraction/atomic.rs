//! All-or-nothing target folder handling for extraction.

use crate::Result;
use crate::folders::make_folder;
use crate::folders::remove_folder;
use std::path::Path;

/// Creates `target_folder` and runs `extract_fn` against it.
///
/// If `extract_fn` fails and the folder did not exist beforehand, the folder
/// and everything written into it are removed before the error is
/// returned. A pre-existing folder is never removed.
///
/// # Errors
///
/// Returns the error from folder creation or from `extract_fn`.
pub fn atomic_extract<T, F>(target_folder: &Path, extract_fn: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let existed = target_folder.symlink_metadata().is_ok();
    make_folder(target_folder)?;

    match extract_fn(target_folder) {
        Ok(value) => Ok(value),
        Err(e) => {
            if !existed && let Err(cleanup) = remove_folder(target_folder) {
                tracing::warn!(
                    path = %target_folder.display(),
                    error = %cleanup,
                    "failed to remove partially extracted folder"
                );
            }
            Err(e)
        }
    }
}
