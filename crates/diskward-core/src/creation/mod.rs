//! Archive creation from a source folder.
//!
//! Entries are selected by [`filters`], then streamed into a zip or tar
//! container by [`zip`] or [`tar`]. [`writer`] ties the steps together and
//! makes the output atomic.

pub mod compression;
pub mod config;
pub mod filters;
pub mod report;
pub mod tar;
pub mod writer;
pub mod zip;

pub use config::CreationConfig;
pub use config::LinkPolicy;
pub use report::CreationReport;
pub use writer::ArchiveWriter;
