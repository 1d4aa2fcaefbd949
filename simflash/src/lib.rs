//! Simulated hardware for host-side bootloader tests.
//!
//! [`SimFlash`] models a NOR flash partition closely enough to catch the
//! bugs that matter here: programming can only clear bits (a write over
//! non-erased data corrupts instead of overwriting), erase granularity is
//! enforced, and an optional fault injection point corrupts one byte during
//! programming to exercise the read-back verify path.  [`serial::SimSerial`]
//! plays the host side of the wire protocol from a script.

pub mod gen;
pub mod serial;
pub mod styles;

use anyhow::{ensure, Result};
use storage::{check_erase, check_read, check_write, Flash, ReadFlash, ERASED};

pub struct SimFlash {
    write_size: usize,
    erase_size: usize,
    base: usize,
    data: Vec<u8>,
    /// Number of erase operations performed, for never-mutated assertions.
    pub erases: usize,
    /// Number of program operations performed.
    pub writes: usize,
    corrupt_at: Option<usize>,
}

impl SimFlash {
    /// A partition of `sectors` erase sectors, mapped at absolute address
    /// `base`.  Starts fully erased.
    pub fn new(write_size: usize, erase_size: usize, sectors: usize, base: usize) -> Result<SimFlash> {
        ensure!(write_size.is_power_of_two(), "write size not a power of two");
        ensure!(erase_size.is_power_of_two(), "erase size not a power of two");
        ensure!(erase_size % write_size == 0, "erase size not a multiple of write size");
        ensure!(sectors > 0, "flash needs at least one sector");
        Ok(SimFlash {
            write_size,
            erase_size,
            base,
            data: vec![ERASED; erase_size * sectors],
            erases: 0,
            writes: 0,
            corrupt_at: None,
        })
    }

    /// Make the cell at `offset` program incorrectly: the next write
    /// covering it stores its byte with one bit flipped.
    pub fn corrupt_at(&mut self, offset: usize) {
        self.corrupt_at = Some(offset);
    }

    /// Place an image in the partition outside the protocol: erase the span
    /// it needs and program it in 0xFF-padded pages.  Used to model firmware
    /// resident from an earlier session.
    pub fn install(&mut self, image: &[u8], offset: usize) -> Result<()> {
        ensure!(offset % self.erase_size == 0, "install offset not sector-aligned");
        let span = storage::round_up(image.len(), self.erase_size);
        self.erase(offset, span)
            .map_err(|e| anyhow::anyhow!("install erase failed: {:?}", e))?;
        let mut padded = image.to_vec();
        padded.resize(storage::round_up(image.len(), self.write_size), ERASED);
        self.write(offset, &padded)
            .map_err(|e| anyhow::anyhow!("install write failed: {:?}", e))?;
        Ok(())
    }

    /// The raw contents, for whole-image assertions.
    pub fn contents(&self) -> &[u8] {
        &self.data
    }
}

impl ReadFlash for SimFlash {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, offset: usize, bytes: &mut [u8]) -> storage::Result<()> {
        check_read(self, offset, bytes.len())?;
        bytes.copy_from_slice(&self.data[offset..offset + bytes.len()]);
        Ok(())
    }
}

impl Flash for SimFlash {
    fn write_size(&self) -> usize {
        self.write_size
    }

    fn erase_size(&self) -> usize {
        self.erase_size
    }

    fn erase(&mut self, offset: usize, length: usize) -> storage::Result<()> {
        check_erase(self, offset, length)?;
        if length == 0 {
            return Ok(());
        }
        self.erases += 1;
        self.data[offset..offset + length].fill(ERASED);
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> storage::Result<()> {
        check_write(self, offset, bytes.len())?;
        self.writes += 1;
        for (i, &byte) in bytes.iter().enumerate() {
            let cell = offset + i;
            let mut value = byte;
            if self.corrupt_at == Some(cell) {
                value ^= 0x20;
            }
            // NOR semantics: programming can only clear bits.
            self.data[cell] &= value;
        }
        Ok(())
    }
}

impl boot::MappedFlash for SimFlash {
    fn get_base(&self) -> usize {
        self.base
    }
}
