//! Device-to-host status tokens.
//!
//! Newline-terminated ASCII literals, each emitted exactly once at the state
//! transition it names.  The host tool keys its own state machine off these,
//! so spelling is part of the wire protocol.

pub const READY: &[u8] = b"BOOTLOADER-READY\n";
pub const MAGIC_ERROR: &[u8] = b"MAGIC-ERROR\n";
pub const HEADER_OK: &[u8] = b"HEADER-OK\n";
pub const CHUNK_OK: &[u8] = b"CHUNK-OK\n";
pub const CHUNK_ERROR: &[u8] = b"CHUNK-ERROR\n";
pub const FLASH_VERIFY_ERROR: &[u8] = b"FLASH-VERIFY-ERROR\n";
pub const FIRMWARE_UPLOADED: &[u8] = b"FIRMWARE-UPLOADED\n";
pub const VERIFYING: &[u8] = b"VERIFYING\n";
pub const VERIFY_OK: &[u8] = b"VERIFY-OK\n";
pub const VERIFY_ERROR: &[u8] = b"VERIFY-ERROR\n";
pub const FIRMWARE_SUCCESS: &[u8] = b"FIRMWARE-SUCCESS\n";
pub const JUMPING: &[u8] = b"JUMPING-TO-APP\n";
pub const JUMP_BAD_SP: &[u8] = b"JUMP-ERROR: BAD-SP\n";
pub const JUMP_BAD_RESET: &[u8] = b"JUMP-ERROR: BAD-RESET\n";
