//! Flash storage traits.
//!
//! The bootloader core is written against these two traits rather than any
//! particular flash peripheral.  `ReadFlash` gives byte-granular read access
//! to a single flash partition (the application slot); `Flash` adds the two
//! mutating operations, erase and program.
//!
//! Implementations of the mutating operations carry a hard platform
//! contract: on parts where the flash being mutated is also the
//! instruction-fetch path (XIP), both `erase` and `write` must execute with
//! all interrupt sources masked for their duration (restored afterward), and
//! from code that remains fetchable while the array is busy — in practice,
//! RAM-resident code.  A vectored interrupt taken mid-erase would fetch from
//! a device that cannot serve reads.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

/// The value every byte of an erased range reads back as.
pub const ERASED: u8 = 0xFF;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    NotAligned,
    OutOfBounds,
}

pub type Result<T> = core::result::Result<T, Error>;

/// Read-only interface into a flash partition.  Offsets are relative to the
/// partition base, not the device.
pub trait ReadFlash {
    /// Size of the partition in bytes.
    fn capacity(&self) -> usize;

    /// Read `bytes.len()` bytes starting at `offset`.  Reads are
    /// byte-granular on every device this supports.
    fn read(&mut self, offset: usize, bytes: &mut [u8]) -> Result<()>;
}

/// A flash partition that can be erased and programmed.
pub trait Flash: ReadFlash {
    /// Program alignment and size multiple (the "page" size).
    fn write_size(&self) -> usize;

    /// Erase alignment and size multiple (the "sector" size).  Always a
    /// multiple of `write_size`.
    fn erase_size(&self) -> usize;

    /// Erase `length` bytes starting at `offset`, leaving them reading as
    /// [`ERASED`].  The caller has already rounded `length` up to
    /// `erase_size`; a length of zero is a no-op.
    fn erase(&mut self, offset: usize, length: usize) -> Result<()>;

    /// Program `bytes` at `offset`.  `bytes.len()` must be a multiple of
    /// `write_size`, and the range must have been erased since it was last
    /// programmed.
    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()>;
}

// Argument validation shared by the simulator and the board drivers, so that
// every implementation rejects the same inputs.

pub fn check_read<T: ReadFlash>(flash: &T, offset: usize, length: usize) -> Result<()> {
    check_bounds(flash, offset, length)
}

pub fn check_erase<T: Flash>(flash: &T, offset: usize, length: usize) -> Result<()> {
    check_bounds(flash, offset, length)?;
    check_aligned(flash.erase_size(), offset, length)
}

pub fn check_write<T: Flash>(flash: &T, offset: usize, length: usize) -> Result<()> {
    check_bounds(flash, offset, length)?;
    check_aligned(flash.write_size(), offset, length)
}

fn check_bounds<T: ReadFlash>(flash: &T, offset: usize, length: usize) -> Result<()> {
    if length > flash.capacity() || offset > flash.capacity() - length {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

fn check_aligned(align: usize, offset: usize, length: usize) -> Result<()> {
    if offset % align != 0 || length % align != 0 {
        return Err(Error::NotAligned);
    }
    Ok(())
}

/// Round `length` up to the next multiple of `granularity` (a power of two).
/// Rounding zero yields zero.
pub fn round_up(length: usize, granularity: usize) -> usize {
    debug_assert!(granularity.is_power_of_two());
    (length + granularity - 1) & !(granularity - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake(usize);

    impl ReadFlash for Fake {
        fn capacity(&self) -> usize {
            self.0
        }
        fn read(&mut self, _offset: usize, _bytes: &mut [u8]) -> Result<()> {
            Ok(())
        }
    }

    impl Flash for Fake {
        fn write_size(&self) -> usize {
            256
        }
        fn erase_size(&self) -> usize {
            4096
        }
        fn erase(&mut self, _offset: usize, _length: usize) -> Result<()> {
            Ok(())
        }
        fn write(&mut self, _offset: usize, _bytes: &[u8]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bounds() {
        let f = Fake(16384);
        assert_eq!(check_read(&f, 0, 16384), Ok(()));
        assert_eq!(check_read(&f, 16384, 0), Ok(()));
        assert_eq!(check_read(&f, 1, 16384), Err(Error::OutOfBounds));
        assert_eq!(check_read(&f, 16384, 1), Err(Error::OutOfBounds));
    }

    #[test]
    fn alignment() {
        let f = Fake(16384);
        assert_eq!(check_write(&f, 256, 512), Ok(()));
        assert_eq!(check_write(&f, 128, 256), Err(Error::NotAligned));
        assert_eq!(check_write(&f, 256, 100), Err(Error::NotAligned));
        assert_eq!(check_erase(&f, 0, 4096), Ok(()));
        assert_eq!(check_erase(&f, 0, 4000), Err(Error::NotAligned));
        assert_eq!(check_erase(&f, 256, 4096), Err(Error::NotAligned));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_up(0, 4096), 0);
        assert_eq!(round_up(1, 4096), 4096);
        assert_eq!(round_up(4096, 4096), 4096);
        assert_eq!(round_up(4097, 4096), 8192);
        assert_eq!(round_up(300, 256), 512);
    }
}
