//! Compression level conversion.
//!
//! User levels follow one scale for every codec:
//!
//! - **1-3**: fast compression (lower CPU usage, larger files)
//! - **6**: default compression (balanced)
//! - **7-9**: best compression (higher CPU usage, smaller files)
//!
//! Each codec maps these levels to its own internal scale.

use std::io::Write;

use crate::formats::CompressionCodec;

/// Converts a user level (1-9) to a flate2 level.
///
/// # Examples
///
/// ```
/// use diskward_core::creation::compression::compression_level_to_flate2;
///
/// assert_eq!(compression_level_to_flate2(None), flate2::Compression::default());
/// assert_eq!(compression_level_to_flate2(Some(9)), flate2::Compression::best());
/// ```
#[must_use]
pub fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None | Some(6) => flate2::Compression::default(),
        Some(1..=3) => flate2::Compression::fast(),
        Some(7..=9) => flate2::Compression::best(),
        Some(n) => flate2::Compression::new(u32::from(n)),
    }
}

/// Converts a user level (1-9) to a bzip2 level.
#[must_use]
pub fn compression_level_to_bzip2(level: Option<u8>) -> bzip2::Compression {
    match level {
        None | Some(6) => bzip2::Compression::default(),
        Some(1) => bzip2::Compression::fast(),
        Some(7..=9) => bzip2::Compression::best(),
        Some(n) => bzip2::Compression::new(u32::from(n.clamp(1, 9))),
    }
}

/// Converts a user level (1-9) to an xz preset.
#[must_use]
pub fn compression_level_to_xz(level: Option<u8>) -> u32 {
    level.map_or(6, |n| u32::from(n.min(9)))
}

/// Converts a user level (1-9) to the deflate level stored in zip entries.
#[must_use]
pub fn compression_level_to_zip(level: Option<u8>) -> i64 {
    i64::from(level.unwrap_or(6).clamp(1, 9))
}

/// Wraps `writer` in an encoder for `codec` at the given user level.
///
/// The returned writer must be finished with
/// [`CompressedWriter::finish`] so trailing codec frames are flushed and
/// errors surface.
pub fn compressed_writer<W: Write>(
    codec: CompressionCodec,
    level: Option<u8>,
    writer: W,
) -> CompressedWriter<W> {
    match codec {
        CompressionCodec::Gzip => CompressedWriter::Gzip(flate2::write::GzEncoder::new(
            writer,
            compression_level_to_flate2(level),
        )),
        CompressionCodec::Bzip2 => CompressedWriter::Bzip2(bzip2::write::BzEncoder::new(
            writer,
            compression_level_to_bzip2(level),
        )),
        CompressionCodec::Xz => {
            CompressedWriter::Xz(xz2::write::XzEncoder::new(writer, compression_level_to_xz(level)))
        }
    }
}

/// A tar stream encoder for one of the supported codecs.
pub enum CompressedWriter<W: Write> {
    /// Gzip encoder.
    Gzip(flate2::write::GzEncoder<W>),
    /// Bzip2 encoder.
    Bzip2(bzip2::write::BzEncoder<W>),
    /// Xz encoder.
    Xz(xz2::write::XzEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Writes the codec trailer and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the final frames cannot be written.
    pub fn finish(self) -> std::io::Result<W> {
        match self {
            Self::Gzip(encoder) => encoder.finish(),
            Self::Bzip2(encoder) => encoder.finish(),
            Self::Xz(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Gzip(encoder) => encoder.write(buf),
            Self::Bzip2(encoder) => encoder.write(buf),
            Self::Xz(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Gzip(encoder) => encoder.flush(),
            Self::Bzip2(encoder) => encoder.flush(),
            Self::Xz(encoder) => encoder.flush(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_flate2_levels() {
        assert_eq!(compression_level_to_flate2(Some(1)), flate2::Compression::fast());
        assert_eq!(compression_level_to_flate2(Some(3)), flate2::Compression::fast());
        assert_eq!(compression_level_to_flate2(Some(6)), flate2::Compression::default());
        assert_eq!(compression_level_to_flate2(Some(5)), flate2::Compression::new(5));
        assert_eq!(compression_level_to_flate2(Some(8)), flate2::Compression::best());
    }

    #[test]
    fn test_bzip2_levels() {
        assert_eq!(compression_level_to_bzip2(Some(1)).level(), bzip2::Compression::fast().level());
        assert_eq!(compression_level_to_bzip2(Some(4)).level(), 4);
        assert_eq!(compression_level_to_bzip2(Some(9)).level(), bzip2::Compression::best().level());
    }

    #[test]
    fn test_xz_and_zip_levels() {
        assert_eq!(compression_level_to_xz(None), 6);
        assert_eq!(compression_level_to_xz(Some(2)), 2);
        assert_eq!(compression_level_to_zip(None), 6);
        assert_eq!(compression_level_to_zip(Some(9)), 9);
    }

    #[test]
    fn test_compressed_writer_round_trip() {
        for codec in [CompressionCodec::Gzip, CompressionCodec::Bzip2, CompressionCodec::Xz] {
            let mut writer = compressed_writer(codec, Some(1), Vec::new());
            writer.write_all(b"payload").unwrap();
            let bytes = writer.finish().unwrap();

            let mut decoded = Vec::new();
            codec.decoder(bytes.as_slice()).read_to_end(&mut decoded).unwrap();
            assert_eq!(decoded, b"payload", "codec {}", codec.name());
        }
    }
}
