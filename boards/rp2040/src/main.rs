//! UART update bootloader for the RP2040.
//!
//! Occupies the first 16 KiB of flash; the application slot is everything
//! after it.  All protocol and policy decisions live in the portable `boot`
//! crate — this binary supplies the UART, the flash driver, and the final
//! control transfer.

#![no_std]
#![no_main]

mod flash;
mod uart;

use panic_halt as _;

use boot::{BootConfig, BootPath, Entry};
use cortex_m::delay::Delay;
use cortex_m_rt::entry;
use fugit::RateExtU32;
use rp2040_hal as hal;

use hal::clocks::init_clocks_and_plls;
use hal::uart::{DataBits, StopBits, UartConfig, UartPeripheral};
use hal::{Clock, Sio, Watchdog};

/// Checksummed second-stage boot block the mask ROM requires.
#[link_section = ".boot2"]
#[used]
pub static BOOT2_FIRMWARE: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;
const UART_BAUD: u32 = 115_200;

/// The application slot: everything past the bootloader's 16 KiB, on a
/// 2 MiB part.
const APP_OFFSET: u32 = 0x4000;
const APP_LENGTH: usize = 2 * 1024 * 1024 - APP_OFFSET as usize;

const CONFIG: BootConfig = BootConfig {
    header_magic: 0x5055_4C42, // "BLUP"
    header_timeout: 2000,
    chunk_timeout: 5000,
    // The XIP window.
    exec_window: 0x1000_0000..0x1100_0000,
    // SRAM proper plus the two scratch banks; a full descending stack may
    // start one past the end.
    ram_window: 0x2000_0000..=0x2004_2000,
    vector_skip: 0x100,
};

#[entry]
fn main() -> ! {
    let mut pac = hal::pac::Peripherals::take().unwrap();
    let core = hal::pac::CorePeripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    let clocks = init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let uart_pins = (
        pins.gpio0.into_function::<hal::gpio::FunctionUart>(),
        pins.gpio1.into_function::<hal::gpio::FunctionUart>(),
    );
    let uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
        .enable(
            UartConfig::new(UART_BAUD.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap();

    let delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
    let mut serial = uart::BootUart::new(uart, delay);
    let mut app = flash::AppFlash::new(APP_OFFSET, APP_LENGTH);

    match boot::run(&mut app, &mut serial, &CONFIG) {
        BootPath::Jump(target) => {
            serial.release();
            unsafe { transfer_control(target) }
        }
        BootPath::Halt => halt(),
    }
}

/// Terminal idle.  Recovery from here is an external reset; this core
/// carries no watchdog of its own.
fn halt() -> ! {
    loop {
        cortex_m::asm::wfe();
    }
}

/// The irreversible control transfer.  Point interrupt dispatch at the
/// application's vector table, then switch stacks and branch in a single
/// asm block — between `msr msp` and `bx` there must be no instruction that
/// could touch the not-yet-valid stack, so ordinary calls are off the table.
unsafe fn transfer_control(target: Entry) -> ! {
    let p = cortex_m::Peripherals::steal();
    p.SCB.vtor.write(target.vector_base);
    cortex_m::asm::dsb();
    cortex_m::asm::isb();

    core::arch::asm!(
        "msr msp, {sp}",
        "bx {reset}",
        sp = in(reg) target.stack_pointer,
        reset = in(reg) target.reset_vector,
        options(noreturn),
    );
}
