//! The update header.

use rawview::{AsMutRaw, AsRaw};

use crate::serial::{Serial, Timeout};

/// The fixed 12-byte record a host sends to open an update: magic word,
/// image size in bytes, and the CRC-32 of the image.  All little-endian,
/// received straight into the struct.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct UpdateHeader {
    pub magic: u32,
    pub size: u32,
    pub crc: u32,
}

impl AsRaw for UpdateHeader {}
unsafe impl AsMutRaw for UpdateHeader {}

const _: () = assert!(core::mem::size_of::<UpdateHeader>() == 12);

impl UpdateHeader {
    /// Receive the header with a bounded per-byte wait.
    pub fn receive<S: Serial>(
        serial: &mut S,
        timeout_per_byte: u32,
    ) -> core::result::Result<UpdateHeader, Timeout> {
        let mut header = UpdateHeader::default();
        serial.recv_exact(header.as_mut_raw(), timeout_per_byte)?;
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_little_endian() {
        let mut h = UpdateHeader::default();
        h.as_mut_raw().copy_from_slice(&[
            0x42, 0x4C, 0x55, 0x50, // "BLUP"
            0x00, 0x02, 0x00, 0x00, // 512
            0x26, 0x39, 0xF4, 0xCB,
        ]);
        assert_eq!(h.magic, 0x5055_4C42);
        assert_eq!(h.size, 512);
        assert_eq!(h.crc, 0xCBF4_3926);
    }
}
