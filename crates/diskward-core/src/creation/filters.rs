//! Entry selection for archive creation.
//!
//! Walks the source folder once and decides, for every entry, whether it is
//! stored and in what form. Skips are decided while walking so that an
//! excluded or rejected directory is never descended into.

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::config::LinkPolicy;
use crate::paths::ExclusionSet;
use crate::security::TrustBoundary;
use crate::security::validator::resolve_lenient;
use crate::types::EntryType;
use crate::walker::FolderWalker;
use crate::walker::normalize_archive_name;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// An entry selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Path to read from. For dereferenced links this is the link itself.
    pub source: PathBuf,

    /// Name inside the archive, relative to the source folder, with `/`
    /// separators.
    pub name: String,

    /// What to store. Dereferenced links carry their target's type.
    pub entry_type: EntryType,
}

/// The entries selected from one source folder.
#[derive(Debug, Clone, Default)]
pub struct EntryPlan {
    /// Entries to store, in walk order.
    pub entries: Vec<PlannedEntry>,

    /// Number of entries left out.
    pub skipped: usize,

    /// One message per rejected link or loop.
    pub warnings: Vec<String>,
}

/// Walks `source` and selects entries according to `config`.
///
/// `ignored` lists files that must never be archived even when they sit
/// inside the source folder, such as the archive being written.
///
/// # Errors
///
/// Returns an error if the exclusion patterns are invalid, the trust
/// boundary cannot be resolved, or the source folder cannot be read.
///
/// # Examples
///
/// ```no_run
/// use diskward_core::creation::CreationConfig;
/// use diskward_core::creation::filters::plan_entries;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CreationConfig::default().with_excluded_names(vec!["*.log".into()]);
/// let plan = plan_entries(Path::new("./project"), &config, &[])?;
/// for entry in &plan.entries {
///     println!("{}", entry.name);
/// }
/// # Ok(())
/// # }
/// ```
pub fn plan_entries(
    source: &Path,
    config: &CreationConfig,
    ignored: &[PathBuf],
) -> Result<EntryPlan> {
    let exclusions = config.exclusion_set()?;
    let boundary = TrustBoundary::new(source, &config.trusted_folders)?;
    let dereference = config.link_policy == LinkPolicy::Dereference;

    let mut filter = EntryFilter {
        root: source,
        policy: config.link_policy,
        exclusions: &exclusions,
        boundary: &boundary,
        ignored,
        skipped: 0,
        warnings: Vec::new(),
    };
    let mut entries = Vec::new();
    let mut loops = Vec::new();
    let mut unfollowed = Vec::new();

    let walker = FolderWalker::new(source).follow_links(dereference);
    for entry in walker.walk_pruned(|relative| filter.should_prune(relative)) {
        let entry = match entry {
            // A link the walker could not follow comes back without passing the prune check
            Ok(entry) if dereference && entry.entry_type.is_symlink() => {
                unfollowed.push(entry.relative);
                continue;
            }
            Ok(entry) => entry,
            Err(ArchiveError::FilesystemLoop { path, ancestor }) if dereference => {
                tracing::warn!(
                    path = %path.display(),
                    ancestor = %ancestor.display(),
                    "skipping symlink that loops back to an ancestor"
                );
                loops.push(format!("Skipped symlink loop: {}", path.display()));
                continue;
            }
            Err(e) => return Err(e),
        };

        entries.push(PlannedEntry {
            name: entry.archive_name(),
            source: entry.path,
            entry_type: entry.entry_type,
        });
    }

    for relative in unfollowed {
        if !filter.should_prune(&relative) {
            tracing::warn!(path = %relative.display(), "skipping symlink that cannot be followed");
            filter.reject(&relative, "Skipped dangling symlink");
        }
    }

    let mut warnings = filter.warnings;
    let skipped = filter.skipped + loops.len();
    warnings.append(&mut loops);

    Ok(EntryPlan {
        entries,
        skipped,
        warnings,
    })
}

/// Per-walk skip decisions and their bookkeeping.
struct EntryFilter<'a> {
    root: &'a Path,
    policy: LinkPolicy,
    exclusions: &'a ExclusionSet,
    boundary: &'a TrustBoundary,
    ignored: &'a [PathBuf],
    skipped: usize,
    warnings: Vec<String>,
}

impl EntryFilter<'_> {
    /// Returns `true` if the entry at `relative` must be left out.
    fn should_prune(&mut self, relative: &Path) -> bool {
        if self.exclusions.is_excluded(relative) {
            tracing::debug!(path = %relative.display(), "excluding entry");
            self.skipped += 1;
            return true;
        }

        let path = self.root.join(relative);
        if self.is_ignored(&path) {
            tracing::debug!(path = %relative.display(), "skipping archive output");
            self.skipped += 1;
            return true;
        }

        let is_link = fs::symlink_metadata(&path).is_ok_and(|m| m.file_type().is_symlink());
        if !is_link {
            return false;
        }

        let rejection = match self.policy {
            LinkPolicy::Exclude => {
                tracing::debug!(path = %relative.display(), "excluding symlink");
                Some("Skipped symlink")
            }
            LinkPolicy::Validate | LinkPolicy::Dereference => match self.boundary.check(&path) {
                Ok(_) if self.policy == LinkPolicy::Dereference && fs::metadata(&path).is_err() => {
                    tracing::warn!(path = %path.display(), "skipping dangling symlink");
                    Some("Skipped dangling symlink")
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping symlink outside trusted folders"
                    );
                    Some("Skipped untrusted symlink")
                }
            },
        };

        match rejection {
            Some(reason) => {
                self.reject(relative, reason);
                true
            }
            None => false,
        }
    }

    fn reject(&mut self, relative: &Path, reason: &str) {
        self.skipped += 1;
        self.warnings
            .push(format!("{reason}: {}", normalize_archive_name(relative)));
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let name = path.file_name();
        self.ignored
            .iter()
            .filter(|ignored| ignored.file_name() == name)
            .any(|ignored| {
                resolve_lenient(path).is_ok_and(|resolved| resolved == *ignored)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(plan: &EntryPlan) -> Vec<&str> {
        plan.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_plan_plain_tree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let plan = plan_entries(temp.path(), &CreationConfig::default(), &[]).unwrap();
        assert_eq!(names(&plan), ["a.txt", "sub", "sub/b.txt"]);
        assert_eq!(plan.entries[1].entry_type, EntryType::Directory);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_plan_excluded_name_prunes_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "x").unwrap();
        fs::write(temp.path().join("keep.txt"), "k").unwrap();

        let config = CreationConfig::default().with_excluded_names(vec![".git".into()]);
        let plan = plan_entries(temp.path(), &config, &[]).unwrap();
        assert_eq!(names(&plan), ["keep.txt"]);
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn test_plan_excluded_path() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/a.md"), "a").unwrap();
        fs::write(temp.path().join("a.md"), "a").unwrap();

        let config = CreationConfig::default().with_excluded_paths(vec!["docs/*.md".into()]);
        let plan = plan_entries(temp.path(), &config, &[]).unwrap();
        assert_eq!(names(&plan), ["a.md", "docs"]);
    }

    #[test]
    fn test_plan_ignores_output_inside_source() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("out.zip"), "partial").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let ignored = [temp.path().canonicalize().unwrap().join("out.zip")];
        let plan = plan_entries(temp.path(), &CreationConfig::default(), &ignored).unwrap();
        assert_eq!(names(&plan), ["a.txt"]);
    }

    #[cfg(unix)]
    mod links {
        use super::*;
        use std::os::unix::fs::symlink;

        /// `source/file.txt`, `source/inner -> file.txt`,
        /// `source/escape -> ../outside/secret.txt`.
        fn setup() -> (TempDir, PathBuf) {
            let temp = TempDir::new().unwrap();
            let root = temp.path().canonicalize().unwrap();
            fs::create_dir(root.join("source")).unwrap();
            fs::create_dir(root.join("outside")).unwrap();
            fs::write(root.join("source/file.txt"), "file").unwrap();
            fs::write(root.join("outside/secret.txt"), "secret").unwrap();
            symlink("file.txt", root.join("source/inner")).unwrap();
            symlink("../outside/secret.txt", root.join("source/escape")).unwrap();
            (temp, root)
        }

        #[test]
        fn test_exclude_policy_drops_every_link() {
            let (_temp, root) = setup();

            let plan = plan_entries(&root.join("source"), &CreationConfig::default(), &[]).unwrap();
            assert_eq!(names(&plan), ["file.txt"]);
            assert_eq!(plan.skipped, 2);
            assert_eq!(plan.warnings.len(), 2);
        }

        #[test]
        fn test_validate_policy_keeps_in_bounds_link() {
            let (_temp, root) = setup();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Validate);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert_eq!(names(&plan), ["file.txt", "inner"]);
            assert_eq!(
                plan.entries[1].entry_type,
                EntryType::Symlink {
                    target: PathBuf::from("file.txt"),
                }
            );
            assert_eq!(plan.skipped, 1);
        }

        #[test]
        fn test_validate_policy_with_trusted_folder() {
            let (_temp, root) = setup();
            let config = CreationConfig::default()
                .with_link_policy(LinkPolicy::Validate)
                .with_trusted_folders(vec![root.join("outside")]);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert_eq!(names(&plan), ["escape", "file.txt", "inner"]);
        }

        #[test]
        fn test_dereference_policy_stores_content() {
            let (_temp, root) = setup();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Dereference);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert_eq!(names(&plan), ["file.txt", "inner"]);
            assert_eq!(plan.entries[1].entry_type, EntryType::File);
            assert_eq!(plan.warnings, ["Skipped untrusted symlink: escape"]);
        }

        #[test]
        fn test_dereference_policy_skips_dangling() {
            let (_temp, root) = setup();
            symlink("missing.txt", root.join("source/dangling")).unwrap();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Dereference);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert!(!names(&plan).contains(&"dangling"));
            assert!(plan.warnings.iter().any(|w| w.contains("dangling")));
        }

        #[test]
        fn test_dereference_policy_skips_dangling_outside_link() {
            let (_temp, root) = setup();
            fs::remove_file(root.join("source/escape")).unwrap();
            symlink("/nonexistent/outside/secret", root.join("source/escape")).unwrap();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Dereference);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert_eq!(names(&plan), ["file.txt", "inner"]);
            assert_eq!(plan.skipped, 1);
            assert_eq!(plan.warnings, ["Skipped untrusted symlink: escape"]);
        }

        #[test]
        fn test_dereference_policy_prunes_outside_directory() {
            let (_temp, root) = setup();
            symlink(root.join("outside"), root.join("source/outside-dir")).unwrap();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Dereference);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert!(names(&plan).iter().all(|name| !name.starts_with("outside-dir")));
        }

        #[test]
        fn test_dereference_policy_skips_loop() {
            let (_temp, root) = setup();
            fs::create_dir(root.join("source/dir")).unwrap();
            symlink("..", root.join("source/dir/up")).unwrap();
            let config = CreationConfig::default().with_link_policy(LinkPolicy::Dereference);

            let plan = plan_entries(&root.join("source"), &config, &[]).unwrap();
            assert!(names(&plan).contains(&"dir"));
            assert!(!names(&plan).contains(&"dir/up"));
            assert!(plan.warnings.iter().any(|w| w.contains("loop")));
        }
    }
}
