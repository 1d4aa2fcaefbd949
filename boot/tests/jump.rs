// Trampoline validation: address windows, the reset-vector fallback, and
// the deliberate absence of any stack-pointer fallback.

use boot::{jump, BootConfig, Error};
use simflash::serial::SimSerial;
use simflash::{styles, SimFlash};

const BASE: u32 = 0x1000_4000;

fn config() -> BootConfig {
    BootConfig {
        header_magic: 0x5055_4C42,
        header_timeout: 4,
        chunk_timeout: 4,
        exec_window: 0x1000_0000..0x1100_0000,
        ram_window: 0x2000_0000..=0x2004_2000,
        vector_skip: 0x100,
    }
}

/// A slot whose image begins with the given vector head.
fn flash_with_head(sp: u32, reset: u32) -> SimFlash {
    let mut flash = styles::RP2040_APP.build().unwrap();
    let mut image = vec![0u8; 8];
    image[0..4].copy_from_slice(&sp.to_le_bytes());
    image[4..8].copy_from_slice(&reset.to_le_bytes());
    flash.install(&image, 0).unwrap();
    flash
}

fn prepare(sp: u32, reset: u32) -> (Result<jump::Entry, Error>, Vec<String>) {
    let mut flash = flash_with_head(sp, reset);
    let mut serial = SimSerial::new();
    let result = jump::prepare(&mut flash, &mut serial, &config());
    (result, serial.tokens())
}

#[test]
fn good_head_jumps() {
    let (result, tokens) = prepare(0x2000_8000, 0x1000_4101);
    let entry = result.unwrap();
    assert_eq!(entry.vector_base, BASE);
    assert_eq!(entry.stack_pointer, 0x2000_8000);
    assert_eq!(entry.reset_vector, 0x1000_4101);
    assert_eq!(tokens, vec!["JUMPING-TO-APP"]);
}

#[test]
fn stack_pointer_window_boundaries() {
    // Inclusive window: both edges are usable stack tops.
    assert!(prepare(0x2000_0000, 0x1000_4101).0.is_ok());
    assert!(prepare(0x2004_2000, 0x1000_4101).0.is_ok());

    for sp in [0x1FFF_FFFF, 0x2004_2001, 0x0000_0000, 0xFFFF_FFFF] {
        let (result, tokens) = prepare(sp, 0x1000_4101);
        assert_eq!(result, Err(Error::InvalidEntryState), "sp {:#x}", sp);
        assert_eq!(tokens, vec!["JUMP-ERROR: BAD-SP"], "sp {:#x}", sp);
    }
}

#[test]
fn reset_vector_window_boundaries() {
    // Half-open window: the start and the last byte inside are taken as-is.
    let (result, _) = prepare(0x2000_8000, 0x1000_0000);
    assert_eq!(result.unwrap().reset_vector, 0x1000_0000);
    let (result, _) = prepare(0x2000_8000, 0x10FF_FFFF);
    assert_eq!(result.unwrap().reset_vector, 0x10FF_FFFF);

    // Everything outside gets the fallback entry point instead of a fault.
    for reset in [0x0FFF_FFFF, 0x1100_0000, 0x1100_0001, 0x2000_0000, 0xFFFF_FFFF] {
        let (result, tokens) = prepare(0x2000_8000, reset);
        let entry = result.unwrap();
        assert_eq!(entry.reset_vector, BASE + 0x100, "reset {:#x}", reset);
        assert_eq!(tokens, vec!["JUMPING-TO-APP"], "reset {:#x}", reset);
    }
}

#[test]
fn erased_slot_is_rejected_on_stack_pointer() {
    // A never-programmed slot reads all-ones: the reset vector falls back,
    // but 0xFFFFFFFF can never be a stack pointer.
    let mut flash = styles::RP2040_APP.build().unwrap();
    let mut serial = SimSerial::new();
    let result = jump::prepare(&mut flash, &mut serial, &config());
    assert_eq!(result, Err(Error::InvalidEntryState));
    assert_eq!(serial.tokens(), vec!["JUMP-ERROR: BAD-SP"]);
}

#[test]
fn fallback_outside_a_narrow_window_is_fatal() {
    // With an execution window that ends below the slot, even the
    // substituted vector fails the re-check.
    let mut config = config();
    config.exec_window = 0x1000_0000..0x1000_4000;

    let mut flash = flash_with_head(0x2000_8000, 0x0000_0000);
    let mut serial = SimSerial::new();
    let result = jump::prepare(&mut flash, &mut serial, &config);
    assert_eq!(result, Err(Error::InvalidEntryState));
    assert_eq!(serial.tokens(), vec!["JUMP-ERROR: BAD-RESET"]);
}

#[test]
fn bad_stack_pointer_reported_before_reset_check() {
    // Both words garbage: the stack pointer verdict wins, matching the
    // fixed validation order.
    let (result, tokens) = prepare(0xFFFF_FFFF, 0xFFFF_FFFF);
    assert_eq!(result, Err(Error::InvalidEntryState));
    assert_eq!(tokens, vec!["JUMP-ERROR: BAD-SP"]);
}
