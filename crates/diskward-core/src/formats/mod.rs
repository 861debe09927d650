//! Archive format detection and stream codecs.

pub mod compression;
pub mod detect;

pub use compression::CompressionCodec;
pub use detect::ARCHIVE_EXTENSIONS;
pub use detect::ArchiveType;
pub use detect::TAR_EXTENSIONS;
pub use detect::ZIP_EXTENSIONS;
pub use detect::detect_format;
pub use detect::detect_in;
pub use detect::strip_archive_extension;
