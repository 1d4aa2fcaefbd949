//! The byte transport the protocol runs over.

/// A bounded receive ran out of its per-byte poll budget.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Timeout;

/// Half-duplex byte transport.  The board implementation wraps the UART; the
/// simulator scripts a host.
pub trait Serial {
    /// Blocking write of the whole byte sequence.  Transport-level loss is
    /// not reported; the protocol's read-back and CRC checks catch it.
    fn send(&mut self, bytes: &[u8]);

    /// Block until one byte arrives, with no bound on the wait.
    fn recv(&mut self) -> u8;

    /// Receive exactly `buf.len()` bytes.  `timeout_per_byte` is the number
    /// of fixed-interval readiness polls allowed for each byte separately,
    /// so a slow but steady sender never trips it.
    fn recv_exact(&mut self, buf: &mut [u8], timeout_per_byte: u32)
        -> core::result::Result<(), Timeout>;
}
