//! UART0 transport adapter.

use boot::serial::{Serial, Timeout};
use cortex_m::delay::Delay;
use rp2040_hal::uart::{Enabled, UartDevice, UartPeripheral, ValidUartPinout};

/// Interval between receive-readiness polls, in milliseconds.  The timeout
/// budgets in [`boot::BootConfig`] count these polls.
const POLL_MS: u32 = 1;

pub struct BootUart<D: UartDevice, P: ValidUartPinout<D>> {
    uart: UartPeripheral<Enabled, D, P>,
    delay: Delay,
}

impl<D: UartDevice, P: ValidUartPinout<D>> BootUart<D, P> {
    pub fn new(uart: UartPeripheral<Enabled, D, P>, delay: Delay) -> Self {
        BootUart { uart, delay }
    }

    /// Let the transmit FIFO drain, then shut the peripheral down.  Called
    /// once, right before control leaves the bootloader for good.
    pub fn release(mut self) {
        // Worst case FIFO drain at 115200 baud is under 3 ms.
        self.delay.delay_ms(10);
        let _ = self.uart.disable();
    }

    fn try_recv(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read_raw(&mut byte) {
            Ok(n) if n > 0 => Some(byte[0]),
            _ => None,
        }
    }
}

impl<D: UartDevice, P: ValidUartPinout<D>> Serial for BootUart<D, P> {
    fn send(&mut self, bytes: &[u8]) {
        self.uart.write_full_blocking(bytes);
    }

    fn recv(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_recv() {
                return byte;
            }
            self.delay.delay_ms(POLL_MS);
        }
    }

    fn recv_exact(
        &mut self,
        buf: &mut [u8],
        timeout_per_byte: u32,
    ) -> core::result::Result<(), Timeout> {
        for slot in buf.iter_mut() {
            let mut polls = 0;
            *slot = loop {
                if let Some(byte) = self.try_recv() {
                    break byte;
                }
                polls += 1;
                if polls > timeout_per_byte {
                    return Err(Timeout);
                }
                self.delay.delay_ms(POLL_MS);
            };
        }
        Ok(())
    }
}
