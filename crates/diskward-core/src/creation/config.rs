//! Configuration for archive creation.

use crate::ArchiveError;
use crate::Result;
use crate::formats::ArchiveType;
use crate::paths::ExclusionSet;
use std::path::PathBuf;

/// How symbolic links found in the source folder are archived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LinkPolicy {
    /// Never store links.
    #[default]
    Exclude,

    /// Store a link as a link when it resolves inside the source folder or a
    /// trusted folder; skip it otherwise.
    Validate,

    /// Follow links, including into directories, and store the content of
    /// in-bounds targets under the link's name. Out-of-bounds links, dangling
    /// links and filesystem loops are skipped.
    Dereference,
}

/// Configuration for archive creation.
///
/// # Examples
///
/// ```
/// use diskward_core::creation::CreationConfig;
/// use diskward_core::creation::LinkPolicy;
///
/// // Secure defaults: links are never stored
/// let config = CreationConfig::default();
/// assert_eq!(config.link_policy, LinkPolicy::Exclude);
///
/// let custom = CreationConfig::default()
///     .with_link_policy(LinkPolicy::Validate)
///     .with_excluded_names(vec![".git".into(), "*.pyc".into()])
///     .with_compression_level(9);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CreationConfig {
    /// How symbolic links are handled.
    ///
    /// Default: [`LinkPolicy::Exclude`].
    pub link_policy: LinkPolicy,

    /// Folders outside the source that links may point into.
    ///
    /// Relative entries are taken relative to the source folder. Only
    /// consulted by [`LinkPolicy::Validate`] and [`LinkPolicy::Dereference`].
    ///
    /// Default: empty.
    pub trusted_folders: Vec<PathBuf>,

    /// Glob patterns matched against each entry's bare name.
    ///
    /// Default: empty.
    pub excluded_names: Vec<String>,

    /// Glob patterns matched against each entry's path relative to the
    /// source folder, with `/` separators.
    ///
    /// Default: empty.
    pub excluded_paths: Vec<String>,

    /// Compression level (1-9). `None` uses the codec default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Store file modes and modification times.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Archive format. `None` means detect from the target extension.
    ///
    /// Default: `None`.
    pub format: Option<ArchiveType>,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            link_policy: LinkPolicy::Exclude,
            trusted_folders: Vec::new(),
            excluded_names: Vec::new(),
            excluded_paths: Vec::new(),
            compression_level: Some(6),
            preserve_permissions: true,
            format: None,
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the link policy.
    #[must_use]
    pub const fn with_link_policy(mut self, policy: LinkPolicy) -> Self {
        self.link_policy = policy;
        self
    }

    /// Sets the trusted folders.
    #[must_use]
    pub fn with_trusted_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.trusted_folders = folders;
        self
    }

    /// Sets the name exclusion patterns.
    #[must_use]
    pub fn with_excluded_names(mut self, patterns: Vec<String>) -> Self {
        self.excluded_names = patterns;
        self
    }

    /// Sets the relative-path exclusion patterns.
    #[must_use]
    pub fn with_excluded_paths(mut self, patterns: Vec<String>) -> Self {
        self.excluded_paths = patterns;
        self
    }

    /// Sets the compression level. Out-of-range values are reported by
    /// [`validate`](Self::validate).
    #[must_use]
    pub const fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub const fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the archive format.
    #[must_use]
    pub const fn with_format(mut self, format: Option<ArchiveType>) -> Self {
        self.format = format;
        self
    }

    /// Compiles the exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidPattern` for malformed globs.
    pub fn exclusion_set(&self) -> Result<ExclusionSet> {
        ExclusionSet::new(&self.excluded_names, &self.excluded_paths)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::InvalidCompressionLevel` if the level is outside 1-9
    /// - `ArchiveError::InvalidPattern` if an exclusion pattern is malformed
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }
        self.exclusion_set().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_config_default() {
        let config = CreationConfig::default();
        assert_eq!(config.link_policy, LinkPolicy::Exclude);
        assert!(config.trusted_folders.is_empty());
        assert!(config.excluded_names.is_empty());
        assert!(config.excluded_paths.is_empty());
        assert_eq!(config.compression_level, Some(6));
        assert!(config.preserve_permissions);
        assert_eq!(config.format, None);
    }

    #[test]
    fn test_creation_config_builder() {
        let config = CreationConfig::new()
            .with_link_policy(LinkPolicy::Dereference)
            .with_trusted_folders(vec![PathBuf::from("/srv/shared")])
            .with_excluded_names(vec!["*.log".to_string()])
            .with_excluded_paths(vec!["build/*".to_string()])
            .with_compression_level(9)
            .with_preserve_permissions(false)
            .with_format(Some(ArchiveType::TarXz));

        assert_eq!(config.link_policy, LinkPolicy::Dereference);
        assert_eq!(config.trusted_folders, [PathBuf::from("/srv/shared")]);
        assert_eq!(config.excluded_names, ["*.log"]);
        assert_eq!(config.excluded_paths, ["build/*"]);
        assert_eq!(config.compression_level, Some(9));
        assert!(!config.preserve_permissions);
        assert_eq!(config.format, Some(ArchiveType::TarXz));
    }

    #[test]
    fn test_creation_config_validate_levels() {
        assert!(CreationConfig::default().with_compression_level(1).validate().is_ok());
        assert!(CreationConfig::default().with_compression_level(9).validate().is_ok());

        for level in [0, 10, 255] {
            let result = CreationConfig::default().with_compression_level(level).validate();
            assert!(matches!(
                result,
                Err(ArchiveError::InvalidCompressionLevel { level: l }) if l == level
            ));
        }
    }

    #[test]
    fn test_creation_config_validate_no_level() {
        let mut config = CreationConfig::default();
        config.compression_level = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_creation_config_validate_pattern() {
        let config = CreationConfig::default().with_excluded_paths(vec!["[oops".to_string()]);
        assert!(matches!(
            config.validate(),
            Err(ArchiveError::InvalidPattern { .. })
        ));
    }
}
