//! Folder lifecycle helpers.
//!
//! Creation helpers never check for existence first: they attempt the
//! create and react to `AlreadyExists`, so concurrent callers cannot both
//! claim the same name. Removal helpers treat an absent path as success.

use crate::Result;
use rand::Rng;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Characters used by [`random_string`].
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Creates `folder` and any missing parents. An existing folder is fine.
///
/// # Errors
///
/// Returns an I/O error if the folder cannot be created, including when a
/// file already occupies the path.
pub fn make_folder(folder: &Path) -> Result<PathBuf> {
    fs::create_dir_all(folder)?;
    Ok(folder.to_path_buf())
}

/// Removes `folder` and everything inside it. An absent folder is fine.
///
/// # Errors
///
/// Returns an I/O error if removal fails for any other reason.
pub fn remove_folder(folder: &Path) -> Result<PathBuf> {
    match fs::remove_dir_all(folder) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(folder.to_path_buf())
}

/// Removes the file or link at `path`. An absent path is fine.
///
/// # Errors
///
/// Returns an I/O error if removal fails for any other reason, including
/// when `path` is a folder.
pub fn remove_path(path: &Path) -> Result<PathBuf> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(path.to_path_buf())
}

/// Creates `base_folder/<n>` for the first free `n >= start_index`.
///
/// # Errors
///
/// Returns an I/O error if `base_folder` or the numbered folder cannot be
/// created.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::folders::make_enumerated_folder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let run = make_enumerated_folder(Path::new("/srv/runs"), 1)?;
/// println!("created {}", run.display());
/// # Ok(())
/// # }
/// ```
pub fn make_enumerated_folder(base_folder: &Path, start_index: u64) -> Result<PathBuf> {
    make_folder(base_folder)?;
    let mut index = start_index;
    loop {
        let folder = base_folder.join(index.to_string());
        match fs::create_dir(&folder) {
            Ok(()) => return Ok(folder),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => index += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Creates `base_folder/<random name>` of `length` characters.
///
/// Each collision makes the next attempted name one character longer, so
/// the loop ends even in a crowded folder.
///
/// # Errors
///
/// Returns an I/O error if `base_folder` or the random folder cannot be
/// created.
pub fn make_random_folder(base_folder: &Path, length: usize) -> Result<PathBuf> {
    make_folder(base_folder)?;
    let mut length = length.max(1);
    loop {
        let folder = base_folder.join(random_string(length));
        match fs::create_dir(&folder) {
            Ok(()) => return Ok(folder),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => length += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Creates a uniquely named folder inside `base_folder`, or inside the
/// system temporary folder when `None`. The base is created if needed.
///
/// The folder is not removed automatically; see
/// [`TemporaryFolder`](crate::TemporaryFolder) for a scoped variant.
///
/// # Errors
///
/// Returns an I/O error if the folder cannot be created.
pub fn make_unique_folder(base_folder: Option<&Path>) -> Result<PathBuf> {
    let folder = match base_folder {
        Some(base) => {
            make_folder(base)?;
            tempfile::Builder::new().tempdir_in(base)?
        }
        None => tempfile::Builder::new().tempdir()?,
    };
    Ok(folder.keep())
}

/// Returns a random string of `length` characters drawn from [`ALPHABET`].
///
/// # Examples
///
/// ```
/// use diskward_core::folders::random_string;
///
/// let name = random_string(8);
/// assert_eq!(name.len(), 8);
/// ```
#[must_use]
pub fn random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
