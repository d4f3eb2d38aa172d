//! # Compression container
//!
//! The on-disk wrapper for compressed documents: a 2-byte zlib-style header,
//! a raw DEFLATE stream, and a trailing 4-byte big-endian Adler-32 checksum
//! of the *uncompressed* payload. The header satisfies zlib's CMF/FLG rules
//! (compression method 8, 16-bit value divisible by 31), which lets
//! [`is_zip`] detect the container from the first bytes without attempting
//! decompression.

const ZLIB_HEADER: [u8; 2] = [0x78, 0x5E];
/// Two bytes of header, four of checksum.
const CONTAINER_OVERHEAD: usize = 6;
const COMPRESSION_LEVEL: u8 = 6;

const ADLER_MODULUS: u32 = 65_521;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressError {
    #[error("not enough data to unzip")]
    TooShort,
    #[error("invalid container header")]
    InvalidHeader,
    #[error("deflate stream malformed or truncated")]
    Inflate,
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

/// Adler-32 over `data`: running sums `a` (from 1) and `b` (from 0) modulo
/// 65521, combined as `(b << 16) | a`. The empty input hashes to 1.
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for &byte in data {
        a = (a + u32::from(byte)) % ADLER_MODULUS;
        b = (b + a) % ADLER_MODULUS;
    }
    (b << 16) | a
}

/// Wrap `data` in the compression container.
#[must_use]
pub fn zip(data: &[u8]) -> Vec<u8> {
    let compressed = miniz_oxide::deflate::compress_to_vec(data, COMPRESSION_LEVEL);
    let mut output = Vec::with_capacity(compressed.len() + CONTAINER_OVERHEAD);
    output.extend_from_slice(&ZLIB_HEADER);
    output.extend_from_slice(&compressed);
    output.extend_from_slice(&adler32(data).to_be_bytes());
    output
}

/// Unwrap the compression container and inflate the payload.
///
/// `skip_checksum` suppresses trailer validation; loads from disk use it to
/// tolerate files written before checksums were computed correctly.
///
/// # Errors
/// Header validation, inflation, and (unless skipped) checksum mismatch.
pub fn unzip(data: &[u8], skip_checksum: bool) -> Result<Vec<u8>, CompressError> {
    validate_header(data)?;
    let body = &data[ZLIB_HEADER.len()..data.len() - 4];
    let inflated =
        miniz_oxide::inflate::decompress_to_vec(body).map_err(|_| CompressError::Inflate)?;
    if !skip_checksum {
        // Trailer position is guaranteed by the length check in the header
        // validation.
        let stored = u32::from_be_bytes(data[data.len() - 4..].try_into().unwrap());
        let computed = adler32(&inflated);
        if stored != computed {
            return Err(CompressError::ChecksumMismatch { stored, computed });
        }
    }
    Ok(inflated)
}

/// Whether `data` looks like the compression container. Checks length and
/// header invariants only; the payload is not touched.
#[must_use]
pub fn is_zip(data: &[u8]) -> bool {
    validate_header(data).is_ok()
}

fn validate_header(data: &[u8]) -> Result<(), CompressError> {
    if data.len() <= CONTAINER_OVERHEAD {
        return Err(CompressError::TooShort);
    }
    let header = u16::from_be_bytes([data[0], data[1]]);
    // Low nibble of the first byte is the compression method, 8 for deflate.
    if (header >> 8) & 0x0F != 0x08 {
        return Err(CompressError::InvalidHeader);
    }
    // zlib requires the 16-bit header to be divisible by 31.
    if header % 31 != 0 {
        return Err(CompressError::InvalidHeader);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{adler32, is_zip, unzip, zip, CompressError};

    const PAYLOAD: &[u8] = b"potenti rutrum erat pellentesque facilisis proin nisi quisque \
        potenti rutrum erat pellentesque facilisis proin nisi quisque";

    #[test]
    fn adler_reference_vectors() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"abc"), 0x024d_0127);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn round_trip() {
        let zipped = zip(PAYLOAD);
        assert!(zipped.len() < PAYLOAD.len());
        assert_eq!(unzip(&zipped, false).unwrap(), PAYLOAD);
    }

    #[test]
    fn detection() {
        assert!(is_zip(&zip(PAYLOAD)));
        assert!(!is_zip(PAYLOAD));
        // Too short to hold header plus trailer.
        assert!(!is_zip(&[0x78, 0x5E, 0x00, 0x00]));
        // Right length, wrong header.
        assert!(!is_zip(b"1234567890"));
    }

    #[test]
    fn compressed_corruption_is_detected() {
        let mut zipped = zip(PAYLOAD);
        // Flip a bit in the middle of the compressed region.
        let middle = zipped.len() / 2;
        zipped[middle] ^= 0x10;
        assert!(unzip(&zipped, false).is_err());
    }

    #[test]
    fn trailer_corruption_is_a_checksum_mismatch() {
        let mut zipped = zip(PAYLOAD);
        let last = zipped.len() - 1;
        zipped[last] ^= 0xFF;
        assert!(matches!(
            unzip(&zipped, false),
            Err(CompressError::ChecksumMismatch { .. })
        ));
        // Legacy loads can opt out of validation.
        assert_eq!(unzip(&zipped, true).unwrap(), PAYLOAD);
    }

    #[test]
    fn empty_payload_zips() {
        let zipped = zip(b"");
        assert!(is_zip(&zipped));
        assert_eq!(unzip(&zipped, false).unwrap(), b"");
    }
}
