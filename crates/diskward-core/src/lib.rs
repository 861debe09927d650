//! Folder archiving and extraction that never leaks files through symbolic
//! links.
//!
//! `diskward-core` writes a folder into a zip or tar archive and extracts
//! such archives back into a folder. Every path that could be redirected by
//! a symbolic link is resolved and checked against a trust boundary (a base
//! folder plus optional trusted folders) before it is read or written:
//!
//! - when archiving, links are left out by default, or stored only when
//!   they resolve inside the boundary ([`LinkPolicy`])
//! - when extracting, entries escaping the target folder are rejected and
//!   extracted links are swept afterwards
//!
//! It also ships the small folder helpers these operations are built on:
//! path resolution ([`paths`]), boundary checks ([`security`]), unique
//! folder creation ([`folders`]) and scoped temporary folders
//! ([`TemporaryFolder`]).
//!
//! # Examples
//!
//! ```no_run
//! use diskward_core::CreationConfig;
//! use diskward_core::ExtractionConfig;
//! use diskward_core::read_archive;
//! use diskward_core::write_archive;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let written = write_archive("project", Some(Path::new("project.tar.gz")), &CreationConfig::default())?;
//! println!("Stored {} files", written.files_added);
//!
//! let read = read_archive("project.tar.gz", Some(Path::new("restored")), &ExtractionConfig::default())?;
//! println!("Extracted {} files", read.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod folders;
pub mod formats;
pub mod paths;
pub mod security;
pub mod temporary;
pub mod types;
pub mod walker;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::read_archive;
pub use api::write_archive;
pub use api::write_tar;
pub use api::write_zip;
pub use creation::ArchiveWriter;
pub use creation::CreationConfig;
pub use creation::CreationReport;
pub use creation::LinkPolicy;
pub use error::ArchiveError;
pub use error::Result;
pub use extraction::ArchiveReader;
pub use extraction::ExtractionConfig;
pub use extraction::ExtractionReport;
pub use temporary::TemporaryFolder;

// Re-export path and format helpers for easier access
pub use formats::ARCHIVE_EXTENSIONS;
pub use formats::ArchiveType;
pub use formats::TAR_EXTENSIONS;
pub use formats::ZIP_EXTENSIONS;
pub use paths::absolute_path;
pub use paths::has_extension;
pub use paths::real_path;
pub use paths::relative_path;
pub use security::check_absolute_path;
pub use security::check_path;
pub use security::check_relative_path;
pub use types::EntryType;
pub use types::ValidatedPath;
