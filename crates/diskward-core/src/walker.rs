//! Lazy folder tree walking.
//!
//! The walker yields every descendant of a root folder (never the root
//! itself) in depth-first pre-order, sorted by file name at each level so
//! that archives built from the same tree are byte-for-byte reproducible.

use crate::ArchiveError;
use crate::Result;
use crate::types::EntryType;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Walks a folder tree.
///
/// A walker holds no cursor: each call to [`walk`](Self::walk) starts a new
/// traversal, so one walker can be iterated any number of times.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::walker::FolderWalker;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let walker = FolderWalker::new(Path::new("./project"));
/// for entry in walker.walk() {
///     let entry = entry?;
///     println!("{} ({:?})", entry.relative.display(), entry.entry_type);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FolderWalker {
    root: PathBuf,
    follow_links: bool,
}

impl FolderWalker {
    /// Creates a walker over `root` that does not follow symbolic links.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            follow_links: false,
        }
    }

    /// Sets whether symbolic links are followed.
    ///
    /// When following, linked directories are descended into and linked
    /// files are reported with their target's type and `followed_link` set.
    /// A link that closes a cycle yields `ArchiveError::FilesystemLoop`, and
    /// a dangling link is reported as an unfollowed [`EntryType::Symlink`].
    #[must_use]
    pub const fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Returns the root folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns an iterator over every entry below the root.
    ///
    /// # Errors
    ///
    /// Items are errors when a folder cannot be read or, while following
    /// links, when a link leads back to one of its ancestors.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkedEntry>> + use<> {
        self.walk_pruned(never_prune)
    }

    /// Returns an iterator that skips entries for which `prune` returns
    /// `true`. A pruned directory's subtree is never read.
    ///
    /// `prune` receives the entry path relative to the root.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diskward_core::walker::FolderWalker;
    /// use std::path::Path;
    ///
    /// let walker = FolderWalker::new(Path::new("./project"));
    /// let entries = walker.walk_pruned(|relative| relative.starts_with("target"));
    /// ```
    pub fn walk_pruned<F>(&self, mut prune: F) -> impl Iterator<Item = Result<WalkedEntry>> + use<F>
    where
        F: FnMut(&Path) -> bool,
    {
        let filter_root = self.root.clone();
        let root = self.root.clone();
        WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || entry
                        .path()
                        .strip_prefix(&filter_root)
                        .map_or(true, |relative| !prune(relative))
            })
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.depth() == 0 => None,
                Ok(entry) => Some(build_entry(&entry, &root)),
                Err(e) => Some(convert_error(e, &root)),
            })
    }
}

/// Walks `root` without following links.
///
/// Shorthand for `FolderWalker::new(root).walk()`.
pub fn walk_paths(root: &Path) -> impl Iterator<Item = Result<WalkedEntry>> + use<> {
    FolderWalker::new(root).walk()
}

const fn never_prune(_: &Path) -> bool {
    false
}

/// One entry produced by [`FolderWalker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Full path of the entry, starting with the walker root.
    pub path: PathBuf,

    /// Path relative to the walker root.
    pub relative: PathBuf,

    /// Entry type. Followed links carry their target's type.
    pub entry_type: EntryType,

    /// `true` if the entry is a symbolic link that was followed.
    pub followed_link: bool,
}

impl WalkedEntry {
    /// Returns `true` if the entry is a link, followed or not.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        self.followed_link || self.entry_type.is_symlink()
    }

    /// Returns the relative path with forward slashes, as stored in
    /// archives.
    #[must_use]
    pub fn archive_name(&self) -> String {
        normalize_archive_name(&self.relative)
    }
}

/// Converts a relative path to archive form (forward slashes on every
/// platform).
#[must_use]
pub fn normalize_archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_entry(entry: &DirEntry, root: &Path) -> Result<WalkedEntry> {
    let path = entry.path().to_path_buf();
    let file_type = entry.file_type();

    let entry_type = EntryType::from_file_type(file_type, &path)?;

    Ok(WalkedEntry {
        relative: relative_to(&path, root),
        followed_link: entry.path_is_symlink() && !file_type.is_symlink(),
        entry_type,
        path,
    })
}

fn convert_error(e: walkdir::Error, root: &Path) -> Result<WalkedEntry> {
    if let (Some(ancestor), Some(path)) = (e.loop_ancestor(), e.path()) {
        return Err(ArchiveError::FilesystemLoop {
            path: path.to_path_buf(),
            ancestor: ancestor.to_path_buf(),
        });
    }

    // A dangling link cannot be followed; report it as the link itself
    let dangling = e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound);
    if dangling
        && let Some(path) = e.path()
        && let Ok(target) = fs::read_link(path)
    {
        return Ok(WalkedEntry {
            path: path.to_path_buf(),
            relative: relative_to(path, root),
            entry_type: EntryType::Symlink { target },
            followed_link: false,
        });
    }

    Err(ArchiveError::Io(io::Error::other(format!("walkdir error: {e}"))))
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
