//! Byte views of `repr(C)` wire records.
//!
//! The wire header and the image vector head are fixed little-endian
//! records; rather than shifting fields together by hand, they are declared
//! as `repr(C)` structs and received directly into their bytes.  `AsRaw`
//! provides the read-only view, which is always safe.  `AsMutRaw` is the
//! writable view and is an unsafe trait: it is only sound to implement for
//! types where every bit pattern of every field is a valid value, which
//! holds for the plain-integer records used here.
//!
//! Both traits assume a little-endian target, which is true of every Cortex-M
//! part this runs on and of the hosts the tests run on.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

use core::{mem, slice};

pub trait AsRaw: Sized {
    fn as_raw(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self as *const _ as *const u8, mem::size_of::<Self>()) }
    }
}

/// Writable byte view.  Implementations promise that all bit patterns are
/// valid for the type, so filling the returned slice from the wire cannot
/// construct an invalid value.
pub unsafe trait AsMutRaw: Sized {
    fn as_mut_raw(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self as *mut _ as *mut u8, mem::size_of::<Self>()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Same shape as the update header: three unsigned words, no padding.
    #[derive(Debug, Default, Eq, PartialEq)]
    #[repr(C)]
    struct Triple {
        magic: u32,
        size: u32,
        crc: u32,
    }

    impl AsRaw for Triple {}
    unsafe impl AsMutRaw for Triple {}

    #[test]
    fn fill_from_wire_bytes() {
        let mut t = Triple::default();
        t.as_mut_raw().copy_from_slice(&[
            0x42, 0x4C, 0x55, 0x50, // magic, little-endian
            0x00, 0x02, 0x00, 0x00, // size = 512
            0x78, 0x56, 0x34, 0x12, // crc
        ]);
        assert_eq!(t.magic, 0x5055_4C42);
        assert_eq!(t.size, 512);
        assert_eq!(t.crc, 0x1234_5678);
    }

    #[test]
    fn view_round_trip() {
        let t = Triple {
            magic: 0x5055_4C42,
            size: 512,
            crc: 0x1234_5678,
        };
        let mut u = Triple::default();
        u.as_mut_raw().copy_from_slice(t.as_raw());
        assert_eq!(t, u);
    }

    #[test]
    fn view_covers_whole_record() {
        let t = Triple::default();
        assert_eq!(t.as_raw().len(), 12);
    }
}
