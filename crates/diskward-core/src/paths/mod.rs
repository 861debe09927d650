//! Path resolution and matching helpers.
//!
//! Everything here is free of disk mutation. [`resolve`] turns raw paths
//! into absolute, real (symlink-resolved) or relative forms; [`matching`]
//! answers extension and glob questions about names and paths.

pub mod matching;
pub mod resolve;

pub use matching::ExclusionSet;
pub use matching::has_extension;
pub use matching::has_name;
pub use matching::is_matching_path;
pub use matching::matching_extension;
pub use resolve::absolute_path;
pub use resolve::real_path;
pub use resolve::relative_path;
