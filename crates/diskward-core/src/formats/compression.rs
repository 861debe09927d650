//! Compression codecs wrapped around tar streams.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz): fast, universally readable
//! - **Bzip2** (.tar.bz2): better ratio, slower
//! - **Xz** (.tar.xz): best ratio, slowest

use std::io::Read;

/// Compression codec for tar archives.
///
/// # Examples
///
/// ```
/// use diskward_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::Gzip.extension(), ".tar.gz");
/// assert_eq!(CompressionCodec::Xz.name(), "xz");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,
}

impl CompressionCodec {
    /// Returns the archive extension for a tar stream compressed with this
    /// codec.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => ".tar.gz",
            Self::Bzip2 => ".tar.bz2",
            Self::Xz => ".tar.xz",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }

    /// Wraps `reader` in the matching decoder.
    ///
    /// Gzip input may hold several concatenated members; all are read.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        }
    }
}
