//! Archive extraction into a folder.
//!
//! Entries are validated against the target folder one by one and written
//! by [`zip`] or [`tar`]. [`purge`] then sweeps the extracted links, and
//! [`atomic`] removes a freshly created target if anything fails.

pub mod atomic;
pub mod config;
pub(crate) mod output;
pub mod purge;
pub mod reader;
pub mod report;
pub mod tar;
pub mod zip;

pub use config::ExtractionConfig;
pub use reader::ArchiveReader;
pub use report::ExtractionReport;
