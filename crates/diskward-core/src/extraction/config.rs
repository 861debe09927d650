//! Configuration for archive extraction.

use std::path::PathBuf;

/// Configuration for archive extraction.
///
/// # Examples
///
/// ```
/// use diskward_core::extraction::ExtractionConfig;
/// use std::path::PathBuf;
///
/// // Secure defaults: every extracted link is removed
/// let config = ExtractionConfig::default();
/// assert!(config.purge_all_links);
///
/// // Keep links that stay inside the target folder or /srv/shared
/// let config = ExtractionConfig::default()
///     .with_purge_all_links(false)
///     .with_trusted_folders(vec![PathBuf::from("/srv/shared")]);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Remove every symbolic link after extraction.
    ///
    /// When `false`, only links resolving outside the target folder and the
    /// trusted folders are removed.
    ///
    /// Default: `true`.
    pub purge_all_links: bool,

    /// Folders outside the target that kept links may point into.
    ///
    /// Relative entries are taken relative to the target folder. Ignored
    /// while `purge_all_links` is `true`.
    ///
    /// Default: empty.
    pub trusted_folders: Vec<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            purge_all_links: true,
            trusted_folders: Vec::new(),
        }
    }
}

impl ExtractionConfig {
    /// Creates a new `ExtractionConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether every link is removed.
    #[must_use]
    pub const fn with_purge_all_links(mut self, purge: bool) -> Self {
        self.purge_all_links = purge;
        self
    }

    /// Sets the trusted folders.
    #[must_use]
    pub fn with_trusted_folders(mut self, folders: Vec<PathBuf>) -> Self {
        self.trusted_folders = folders;
        self
    }
}
