//! Flash geometries.
//!
//! The protocol's chunking and erase rounding depend only on the two
//! granularities, so the session tests run across a few representative
//! geometries rather than one.

use crate::SimFlash;
use anyhow::Result;

/// The shape of one application slot.
pub struct AreaLayout {
    pub write_size: usize,
    pub erase_size: usize,
    pub sectors: usize,
    /// Absolute mapped address of the slot base.
    pub base: usize,
}

impl AreaLayout {
    pub fn build(&self) -> Result<SimFlash> {
        SimFlash::new(self.write_size, self.erase_size, self.sectors, self.base)
    }
}

/// RP2040-style: 256-byte pages, 4 KiB sectors, slot 16 KiB into XIP.
pub static RP2040_APP: AreaLayout = AreaLayout {
    write_size: 256,
    erase_size: 4096,
    sectors: 16,
    base: 0x1000_4000,
};

/// Word-programmable style (many STM32/K64 parts): tiny write unit, the
/// chunk loop degenerates to one token per few bytes.
pub static SMALL_WRITE_APP: AreaLayout = AreaLayout {
    write_size: 8,
    erase_size: 2048,
    sectors: 32,
    base: 0x0800_8000,
};

/// Paged style (LPC55-like): write unit equals the erase unit.
pub static PAGED_APP: AreaLayout = AreaLayout {
    write_size: 512,
    erase_size: 512,
    sectors: 128,
    base: 0x0002_0000,
};

pub static ALL_LAYOUTS: [&AreaLayout; 3] = [&RP2040_APP, &SMALL_WRITE_APP, &PAGED_APP];

/// One freshly erased slot per layout.
pub fn all_flashes() -> impl Iterator<Item = Result<SimFlash>> {
    ALL_LAYOUTS.iter().map(|layout| layout.build())
}
