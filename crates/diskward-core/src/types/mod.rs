//! Type-safe wrappers for validated paths and walked entries.
//!
//! # Design Principles
//!
//! - Type-driven security: a [`ValidatedPath`] proves a trust-boundary check
//!   happened
//! - No `From<RawType>` implementations for security types

pub mod entry_type;
pub mod validated_path;

pub use entry_type::EntryType;
pub use validated_path::ValidatedPath;
