//! Portable core of a UART update bootloader.
//!
//! On reset the device offers a host one chance to push a new application
//! image over the serial link; if the host stays silent, whatever image is
//! already resident gets booted instead.  Everything protocol- and
//! policy-shaped lives here, written against the [`serial::Serial`] and
//! [`storage::Flash`] traits so the whole flow runs unmodified under the
//! host-side simulator.  The two things that cannot be portable — the
//! transport driver and the final stack-switch-and-branch — live in the
//! board crates.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod crc32;
mod header;
pub mod jump;
pub mod serial;
mod session;
pub mod token;

use core::ops::{Range, RangeInclusive};

pub use header::UpdateHeader;
pub use jump::{Entry, VectorHead};
pub use session::{SessionOutcome, State, UpdateSession};

use serial::Serial;
use storage::Flash;

pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong between reset and the jump.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// A bounded receive ran out of polls.
    Timeout,
    /// The header magic did not match ours.
    ProtocolMismatch,
    /// A programmed page read back differently than it was sent.
    WriteVerifyMismatch,
    /// The whole-image CRC did not match the header.
    ChecksumMismatch,
    /// The resident image's stack pointer or reset vector is unusable.
    InvalidEntryState,
    Flash(storage::Error),
}

impl From<storage::Error> for Error {
    fn from(e: storage::Error) -> Self {
        Error::Flash(e)
    }
}

impl From<serial::Timeout> for Error {
    fn from(_: serial::Timeout) -> Self {
        Error::Timeout
    }
}

/// Some kinds of flash can be mapped into memory.  The application slot must
/// be: the trampoline needs its absolute address for the vector-table base
/// and the reset-vector fallback.
pub trait MappedFlash {
    /// Absolute address of the start of this flash partition.
    fn get_base(&self) -> usize;
}

/// Per-board protocol and address-window parameters.  Timeouts count
/// fixed-interval readiness polls, one budget per received byte.
pub struct BootConfig {
    /// Expected value of the header's magic word.
    pub header_magic: u32,
    /// Per-byte poll budget while receiving the 12-byte header.
    pub header_timeout: u32,
    /// Per-byte poll budget while receiving chunk payloads.
    pub chunk_timeout: u32,
    /// Addresses instructions can be fetched from (half-open).
    pub exec_window: Range<u32>,
    /// Addresses the initial stack pointer may take.  Inclusive: a full
    /// descending stack starts one past the last byte of RAM.
    pub ram_window: RangeInclusive<u32>,
    /// Offset added to the slot base when substituting a reset vector,
    /// sized to skip an assumed vector table.
    pub vector_skip: u32,
}

/// The reset-time decision, handed back to the board crate.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BootPath {
    /// Transfer control to the validated entry.
    Jump(Entry),
    /// Idle forever; nothing on flash can be trusted.
    Halt,
}

/// The whole reset-time sequence: announce readiness, run one update
/// session, then either validate the resident image for the jump or give up.
/// This never loops or blocks on its own — halting is the board's job, which
/// keeps every path reachable from host tests.
pub fn run<F, S>(flash: &mut F, serial: &mut S, config: &BootConfig) -> BootPath
where
    F: Flash + MappedFlash,
    S: Serial,
{
    serial.send(token::READY);

    match UpdateSession::new(config).run(flash, serial) {
        SessionOutcome::Boot => match jump::prepare(flash, serial, config) {
            Ok(entry) => BootPath::Jump(entry),
            Err(_) => BootPath::Halt,
        },
        SessionOutcome::Halt => BootPath::Halt,
    }
}
