//! A scripted serial peer.
//!
//! Tests queue up everything the host will ever send, run the bootloader,
//! then inspect the bytes the device sent back.  Timeouts are modeled by
//! simply running out of script: `starve_after(n)` makes the peer fall
//! silent after supplying `n` bytes, which trips the next bounded receive.

use boot::serial::{Serial, Timeout};
use std::collections::VecDeque;

#[derive(Default)]
pub struct SimSerial {
    incoming: VecDeque<u8>,
    outgoing: Vec<u8>,
    starve_after: Option<usize>,
    supplied: usize,
}

impl SimSerial {
    pub fn new() -> SimSerial {
        SimSerial::default()
    }

    /// Append bytes to the host's script.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes);
    }

    /// Fall silent after `n` more bytes have been supplied.
    pub fn starve_after(&mut self, n: usize) {
        self.starve_after = Some(self.supplied + n);
    }

    /// Everything the device has sent, raw.
    pub fn sent(&self) -> &[u8] {
        &self.outgoing
    }

    /// The device's output split into newline-terminated tokens.
    pub fn tokens(&self) -> Vec<String> {
        String::from_utf8(self.outgoing.clone())
            .expect("device sent non-UTF8 output")
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn supply(&mut self) -> Option<u8> {
        if let Some(limit) = self.starve_after {
            if self.supplied >= limit {
                return None;
            }
        }
        let byte = self.incoming.pop_front()?;
        self.supplied += 1;
        Some(byte)
    }
}

impl Serial for SimSerial {
    fn send(&mut self, bytes: &[u8]) {
        self.outgoing.extend_from_slice(bytes);
    }

    fn recv(&mut self) -> u8 {
        // The real device would wait forever; in a test an exhausted script
        // here is a bug in the script.
        self.supply().expect("script exhausted in unbounded receive")
    }

    fn recv_exact(
        &mut self,
        buf: &mut [u8],
        _timeout_per_byte: u32,
    ) -> core::result::Result<(), Timeout> {
        for slot in buf.iter_mut() {
            *slot = self.supply().ok_or(Timeout)?;
        }
        Ok(())
    }
}
