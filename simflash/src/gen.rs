//! Firmware image generation.
//!
//! Produces deterministic pseudo-random images with a plausible vector head,
//! plus the 12-byte wire header a host would send for them.

use anyhow::{ensure, Result};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

pub struct Firmware {
    pub data: Vec<u8>,
    pub crc: u32,
}

impl Firmware {
    /// The wire header announcing this image.
    pub fn wire_header(&self, magic: u32) -> [u8; 12] {
        let mut header = [0u8; 12];
        header[0..4].copy_from_slice(&magic.to_le_bytes());
        header[4..8].copy_from_slice(&(self.data.len() as u32).to_le_bytes());
        header[8..12].copy_from_slice(&self.crc.to_le_bytes());
        header
    }
}

pub struct GenBuilder {
    size: usize,
    seed: u64,
    stack_pointer: u32,
    reset_vector: u32,
}

impl Default for GenBuilder {
    fn default() -> Self {
        GenBuilder {
            size: 512,
            seed: 1,
            // Sensible for an RP2040-style part: stack at the top of SRAM,
            // entry just past the vector table, thumb bit set.
            stack_pointer: 0x2004_2000,
            reset_vector: 0x1000_4101,
        }
    }
}

impl GenBuilder {
    pub fn size(&mut self, size: usize) -> &mut Self {
        self.size = size;
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    pub fn stack_pointer(&mut self, sp: u32) -> &mut Self {
        self.stack_pointer = sp;
        self
    }

    pub fn reset_vector(&mut self, reset: u32) -> &mut Self {
        self.reset_vector = reset;
        self
    }

    pub fn build(&self) -> Result<Firmware> {
        ensure!(
            self.size == 0 || self.size >= 8,
            "an image with no room for a vector head makes no sense"
        );
        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let mut data = vec![0u8; self.size];
        rng.fill_bytes(&mut data);

        if self.size >= 8 {
            data[0..4].copy_from_slice(&self.stack_pointer.to_le_bytes());
            data[4..8].copy_from_slice(&self.reset_vector.to_le_bytes());
        }

        let crc = boot::crc32::checksum(&data);
        Ok(Firmware { data, crc })
    }
}
