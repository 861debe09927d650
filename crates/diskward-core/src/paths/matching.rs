//! Extension and glob matching.
//!
//! Glob patterns use the syntax of the `glob` crate: `*`, `?`, `[...]` and
//! `[!...]`. Matching is case-sensitive and `*` may cross `/` when a pattern
//! is applied to a whole path.

use crate::ArchiveError;
use crate::Result;
use glob::MatchOptions;
use glob::Pattern;
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Returns the longest extension in `extensions` that `path` ends with.
///
/// Comparison is ASCII case-insensitive. Extensions may be compound
/// (`.tar.gz`); the longest match wins regardless of list order.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::matching_extension;
/// use std::path::Path;
///
/// let extensions = [".gz", ".tar.gz"];
/// assert_eq!(matching_extension(Path::new("a.tar.gz"), &extensions), Some(".tar.gz"));
/// assert_eq!(matching_extension(Path::new("a.gz"), &extensions), Some(".gz"));
/// assert_eq!(matching_extension(Path::new("a.zip"), &extensions), None);
/// ```
#[must_use]
pub fn matching_extension<'a>(path: &Path, extensions: &[&'a str]) -> Option<&'a str> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    extensions
        .iter()
        .copied()
        .filter(|extension| {
            let extension = extension.to_ascii_lowercase();
            name.len() > extension.len() && name.ends_with(&extension)
        })
        .max_by_key(|extension| extension.len())
}

/// Returns `true` if `path` ends with any of `extensions`.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::has_extension;
/// use std::path::Path;
///
/// assert!(has_extension(Path::new("a.txt"), &[".txt"]));
/// assert!(!has_extension(Path::new("a.zip"), &[".txt"]));
/// ```
#[must_use]
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    matching_extension(path, extensions).is_some()
}

/// Returns `true` if the bare `name` matches any glob in `patterns`.
///
/// Invalid patterns never match.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::has_name;
///
/// assert!(has_name("notes.txt", &["*.txt"]));
/// assert!(has_name("a1", &["a?"]));
/// assert!(!has_name("Notes.TXT", &["*.txt"]));
/// ```
#[must_use]
pub fn has_name<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| {
        Pattern::new(pattern.as_ref()).is_ok_and(|glob| glob.matches_with(name, MATCH_OPTIONS))
    })
}

/// Returns `true` if the whole `path` matches any glob in `patterns`.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::is_matching_path;
/// use std::path::Path;
///
/// assert!(is_matching_path(Path::new("a.txt"), &["*.txt"]));
/// assert!(is_matching_path(Path::new("docs/a.txt"), &["docs/*"]));
/// assert!(!is_matching_path(Path::new("a.zip"), &["*.txt"]));
/// ```
#[must_use]
pub fn is_matching_path<S: AsRef<str>>(path: &Path, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| {
        Pattern::new(pattern.as_ref())
            .is_ok_and(|glob| glob.matches_path_with(path, MATCH_OPTIONS))
    })
}

/// Compiled exclusion patterns for archive creation.
///
/// Holds two independent pattern lists: one matched against an entry's bare
/// name and one matched against its path relative to the archive root. An
/// entry is excluded if either list matches.
///
/// # Examples
///
/// ```
/// use diskward_core::paths::ExclusionSet;
/// use std::path::Path;
///
/// let set = ExclusionSet::new(&["*.log"], &["build/*"]).unwrap();
/// assert!(set.is_excluded(Path::new("src/debug.log")));
/// assert!(set.is_excluded(Path::new("build/out.bin")));
/// assert!(!set.is_excluded(Path::new("src/main.rs")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    names: Vec<Pattern>,
    paths: Vec<Pattern>,
}

impl ExclusionSet {
    /// Compiles name and path patterns.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidPattern` for the first pattern that is
    /// not valid glob syntax.
    pub fn new<S: AsRef<str>>(names: &[S], paths: &[S]) -> Result<Self> {
        Ok(Self {
            names: compile(names)?,
            paths: compile(paths)?,
        })
    }

    /// Returns `true` if no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.paths.is_empty()
    }

    /// Checks a path relative to the archive root against both lists.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let name_matches = relative
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                self.names
                    .iter()
                    .any(|glob| glob.matches_with(name, MATCH_OPTIONS))
            });

        name_matches
            || self
                .paths
                .iter()
                .any(|glob| glob.matches_path_with(relative, MATCH_OPTIONS))
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern.as_ref()).map_err(|e| ArchiveError::InvalidPattern {
                pattern: pattern.as_ref().to_string(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;

    #[test]
    fn test_has_extension_simple() {
        assert!(has_extension(Path::new("a.txt"), &[".txt"]));
        assert!(!has_extension(Path::new("a.zip"), &[".txt"]));
    }

    #[test]
    fn test_has_extension_case_insensitive() {
        assert!(has_extension(Path::new("ARCHIVE.ZIP"), &[".zip"]));
        assert!(has_extension(Path::new("a.Tar.Gz"), &[".tar.gz"]));
    }

    #[test]
    fn test_matching_extension_prefers_longest() {
        let extensions = [".gz", ".tar.gz"];
        assert_eq!(matching_extension(Path::new("a.tar.gz"), &extensions), Some(".tar.gz"));

        let extensions = [".tar.gz", ".gz"];
        assert_eq!(matching_extension(Path::new("a.tar.gz"), &extensions), Some(".tar.gz"));
    }

    #[test]
    fn test_matching_extension_requires_stem() {
        // A bare ".zip" has no name before the extension
        assert_eq!(matching_extension(Path::new(".zip"), &[".zip"]), None);
    }

    #[test]
    fn test_matching_extension_uses_file_name_only() {
        assert_eq!(matching_extension(Path::new("dir.zip/file"), &[".zip"]), None);
    }

    #[test]
    fn test_has_name_glob_syntax() {
        assert!(has_name("file.txt", &["*.txt"]));
        assert!(has_name("file1", &["file?"]));
        assert!(has_name("b", &["[abc]"]));
        assert!(!has_name("d", &["[abc]"]));
        assert!(!has_name("file.txt", &["*.zip"]));
    }

    #[test]
    fn test_has_name_case_sensitive() {
        assert!(!has_name("FILE.TXT", &["*.txt"]));
    }

    #[test]
    fn test_has_name_invalid_pattern_never_matches() {
        assert!(!has_name("[", &["["]));
    }

    #[test]
    fn test_is_matching_path() {
        assert!(is_matching_path(Path::new("a.txt"), &["*.txt"]));
        assert!(is_matching_path(Path::new("dir/sub/a.txt"), &["*.txt"]));
        assert!(is_matching_path(Path::new("dir/sub/a.txt"), &["dir/*/a.txt"]));
        assert!(!is_matching_path(Path::new("a.zip"), &["*.txt"]));
    }

    #[test]
    fn test_exclusion_set_invalid_pattern() {
        let result = ExclusionSet::new(&["[unclosed"], &[]);
        assert!(matches!(result, Err(ArchiveError::InvalidPattern { .. })));
    }

    #[test]
    fn test_exclusion_set_name_only() {
        let set = ExclusionSet::new(&[".git"], &[]).unwrap();
        assert!(set.is_excluded(Path::new(".git")));
        assert!(set.is_excluded(Path::new("vendor/.git")));
        assert!(!set.is_excluded(Path::new(".github")));
    }

    #[test]
    fn test_exclusion_set_path_only() {
        let set = ExclusionSet::new(&[], &["docs/*.md"]).unwrap();
        assert!(set.is_excluded(Path::new("docs/readme.md")));
        assert!(!set.is_excluded(Path::new("readme.md")));
    }

    #[test]
    fn test_exclusion_set_empty() {
        let set = ExclusionSet::default();
        assert!(set.is_empty());
        assert!(!set.is_excluded(Path::new("anything")));
    }
}
