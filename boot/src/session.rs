//! The update session: one shot at replacing the application image.
//!
//! The protocol is deliberately asymmetric about failure.  Until the first
//! erase, the resident image is known-good and every failure (silent host,
//! foreign magic) falls through to booting it.  From the erase onward the
//! slot may be half-written, so every failure is terminal: announce it once
//! and report [`SessionOutcome::Halt`].  No retries — the host retries by
//! resetting the device and starting a fresh session.

use storage::{Flash, ReadFlash, ERASED};

use crate::crc32;
use crate::serial::Serial;
use crate::token;
use crate::{BootConfig, Error, Result, UpdateHeader};

/// Largest device page the session can buffer.  Write granularities above
/// this are rejected at session start.
pub const MAX_PAGE: usize = 4096;

/// Protocol states.  `Success` and `Halted` are terminal; the others advance
/// strictly left to right.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State {
    AwaitTrigger,
    ReadHeader,
    Erase,
    ProgramLoop,
    FinalVerify,
    Success,
    Halted,
}

/// What the board should do once the session is over.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionOutcome {
    /// Boot the image now resident — freshly written, or untouched because
    /// no acceptable update was offered.
    Boot,
    /// Storage may be half-written; never jump, idle forever.
    Halt,
}

/// Ephemeral per-reset protocol engine.  Discarded at session end; nothing
/// carries across resets.
pub struct UpdateSession<'c> {
    config: &'c BootConfig,
    state: State,
    bytes_remaining: usize,
    /// Always a multiple of the device write size: whole pages only.
    bytes_written: usize,
}

impl<'c> UpdateSession<'c> {
    pub fn new(config: &'c BootConfig) -> UpdateSession<'c> {
        UpdateSession {
            config,
            state: State::AwaitTrigger,
            bytes_remaining: 0,
            bytes_written: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Drive the session to a terminal state.
    pub fn run<F: Flash, S: Serial>(mut self, flash: &mut F, serial: &mut S) -> SessionOutcome {
        // Any byte starts a session; its value carries no meaning.  No
        // timeout here — with no host attached the device just waits.
        let _ = serial.recv();

        self.state = State::ReadHeader;
        let header = match UpdateHeader::receive(serial, self.config.header_timeout) {
            Ok(header) => header,
            // The trigger byte was noise and no header followed.  Nothing
            // has been touched; boot what is resident.
            Err(_) => return SessionOutcome::Boot,
        };

        // An image larger than the slot is rejected like a foreign header:
        // nothing has been touched yet, so the resident image still boots.
        if header.magic != self.config.header_magic
            || header.size as usize > flash.capacity()
        {
            serial.send(token::MAGIC_ERROR);
            return SessionOutcome::Boot;
        }
        serial.send(token::HEADER_OK);

        match self.update(flash, serial, &header) {
            Ok(()) => {
                self.state = State::Success;
                serial.send(token::FIRMWARE_SUCCESS);
                SessionOutcome::Boot
            }
            Err(_) => {
                self.state = State::Halted;
                SessionOutcome::Halt
            }
        }
    }

    /// Erase, program chunk by chunk, then verify the whole image.  Every
    /// error path has already sent its token when this returns.
    fn update<F: Flash, S: Serial>(
        &mut self,
        flash: &mut F,
        serial: &mut S,
        header: &UpdateHeader,
    ) -> Result<()> {
        let size = header.size as usize;
        let page_size = flash.write_size();

        let mut page = heapless::Vec::<u8, MAX_PAGE>::new();
        let mut readback = heapless::Vec::<u8, MAX_PAGE>::new();
        page.resize(page_size, ERASED)
            .map_err(|()| Error::Flash(storage::Error::OutOfBounds))?;
        readback
            .resize(page_size, 0)
            .map_err(|()| Error::Flash(storage::Error::OutOfBounds))?;

        self.state = State::Erase;
        let erase_len = storage::round_up(size, flash.erase_size());
        flash.erase(0, erase_len)?;

        self.state = State::ProgramLoop;
        self.bytes_remaining = size;
        self.bytes_written = 0;

        while self.bytes_remaining > 0 {
            let chunk_len = self.bytes_remaining.min(page_size);

            // The unused tail of a final partial chunk must stay at the
            // erased value, not whatever the previous chunk left behind.
            page.fill(ERASED);

            serial.send(token::CHUNK_OK);
            if serial
                .recv_exact(&mut page[..chunk_len], self.config.chunk_timeout)
                .is_err()
            {
                serial.send(token::CHUNK_ERROR);
                return Err(Error::Timeout);
            }

            // Whole pages only, so no torn partial-page state can exist.
            flash.write(self.bytes_written, &page)?;

            flash.read(self.bytes_written, &mut readback)?;
            if readback[..chunk_len] != page[..chunk_len] {
                serial.send(token::FLASH_VERIFY_ERROR);
                return Err(Error::WriteVerifyMismatch);
            }

            self.bytes_written += page_size;
            self.bytes_remaining -= chunk_len;
        }
        serial.send(token::FIRMWARE_UPLOADED);

        self.state = State::FinalVerify;
        serial.send(token::VERIFYING);
        if crc32::checksum_flash(flash, size)? != header.crc {
            serial.send(token::VERIFY_ERROR);
            return Err(Error::ChecksumMismatch);
        }
        serial.send(token::VERIFY_OK);
        Ok(())
    }
}
