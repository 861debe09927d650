//! Path validation against a trust boundary.

pub mod validator;

pub use validator::TrustBoundary;
pub use validator::check_absolute_path;
pub use validator::check_path;
pub use validator::check_relative_path;
