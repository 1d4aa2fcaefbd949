//! The RP2040 application slot.
//!
//! Reads go straight through the XIP window.  Erase and program go through
//! the mask-ROM routines via `rp2040-flash`, which parks XIP and runs from
//! RAM for the duration — mandatory here, since the array being mutated is
//! the same one instructions are normally fetched from.  Both mutations are
//! wrapped in `cortex_m::interrupt::free` so no handler can attempt a
//! code fetch while the array is busy; the previous mask state is restored
//! on the way out.

use storage::{Flash, ReadFlash};

/// Start of the XIP window.
pub const XIP_BASE: usize = 0x1000_0000;

const SECTOR_SIZE: usize = 4096;
const PAGE_SIZE: usize = 256;

pub struct AppFlash {
    /// Offset of the slot from the start of flash.
    offset: u32,
    len: usize,
}

impl AppFlash {
    /// `offset` and `len` must both be sector multiples.
    pub const fn new(offset: u32, len: usize) -> AppFlash {
        assert!(offset as usize % SECTOR_SIZE == 0);
        assert!(len % SECTOR_SIZE == 0);
        AppFlash { offset, len }
    }
}

impl ReadFlash for AppFlash {
    fn capacity(&self) -> usize {
        self.len
    }

    fn read(&mut self, offset: usize, bytes: &mut [u8]) -> storage::Result<()> {
        storage::check_read(self, offset, bytes.len())?;
        let base = XIP_BASE + self.offset as usize + offset;
        let mapped = unsafe { core::slice::from_raw_parts(base as *const u8, bytes.len()) };
        bytes.copy_from_slice(mapped);
        Ok(())
    }
}

impl Flash for AppFlash {
    fn write_size(&self) -> usize {
        PAGE_SIZE
    }

    fn erase_size(&self) -> usize {
        SECTOR_SIZE
    }

    fn erase(&mut self, offset: usize, length: usize) -> storage::Result<()> {
        storage::check_erase(self, offset, length)?;
        if length == 0 {
            return Ok(());
        }
        cortex_m::interrupt::free(|_| unsafe {
            rp2040_flash::flash::flash_range_erase(self.offset + offset as u32, length as u32, true);
        });
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> storage::Result<()> {
        storage::check_write(self, offset, bytes.len())?;
        cortex_m::interrupt::free(|_| unsafe {
            rp2040_flash::flash::flash_range_program(self.offset + offset as u32, bytes, true);
        });
        Ok(())
    }
}

impl boot::MappedFlash for AppFlash {
    fn get_base(&self) -> usize {
        XIP_BASE + self.offset as usize
    }
}
