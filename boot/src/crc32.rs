//! Whole-image integrity check.
//!
//! CRC-32/ISO-HDLC: the reflected 0xEDB88320 polynomial, seeded with
//! all-ones and complemented on output — the same 32-bit CRC most archive
//! formats use, and the one the host tool computes before sending the
//! header.

use crc::{Crc, CRC_32_ISO_HDLC};
use storage::ReadFlash;

use crate::Result;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CRC of an in-memory byte slice.  `checksum(&[])` is 0, the
/// seed/complement identity.
pub fn checksum(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}

/// The same CRC over the first `length` bytes of a flash partition, streamed
/// through a small stack buffer.
pub fn checksum_flash<F: ReadFlash>(flash: &mut F, length: usize) -> Result<u32> {
    let mut digest = CRC32.digest();
    let mut buffer = [0u8; 128];
    let mut pos = 0;
    while pos < length {
        let todo = (length - pos).min(buffer.len());
        let buf = &mut buffer[..todo];
        flash.read(pos, buf)?;
        digest.update(buf);
        pos += todo;
    }
    Ok(digest.finalize())
}
