//! Boot trampoline: validate the resident image's entry data.
//!
//! All raw-address reasoning stays in this module.  The irreversible part —
//! installing the vector-table base and the fused stack-switch-and-branch —
//! is the board crate's `transfer_control`, which consumes the [`Entry`]
//! produced here and never returns.

use rawview::{AsMutRaw, AsRaw};
use storage::ReadFlash;

use crate::serial::Serial;
use crate::token;
use crate::{BootConfig, Error, MappedFlash, Result};

/// The first two words of an application image: initial stack pointer, then
/// the reset handler address.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct VectorHead {
    pub stack_pointer: u32,
    pub reset_vector: u32,
}

impl AsRaw for VectorHead {}
unsafe impl AsMutRaw for VectorHead {}

/// A validated control-transfer target.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Entry {
    /// Address the vector-table base register is pointed at before the jump.
    pub vector_base: u32,
    pub stack_pointer: u32,
    pub reset_vector: u32,
}

/// Read and validate the vector head, announcing the verdict.
///
/// An out-of-window reset vector gets one recovery attempt: assume a vector
/// table of the usual size at the slot base and enter just past it.  There
/// is no such recovery for the stack pointer — fabricating one would trade a
/// clean halt for silent memory corruption — so that case is fatal.  The
/// substituted reset vector is checked against the window again along with
/// everything else; by construction it passes, but the check also guards
/// windows narrower than the slot.
pub fn prepare<F, S>(flash: &mut F, serial: &mut S, config: &BootConfig) -> Result<Entry>
where
    F: ReadFlash + MappedFlash,
    S: Serial,
{
    let mut head = VectorHead::default();
    flash.read(0, head.as_mut_raw())?;
    let base = flash.get_base() as u32;

    let mut reset = head.reset_vector;
    if !config.exec_window.contains(&reset) {
        reset = base + config.vector_skip;
    }

    if !config.ram_window.contains(&head.stack_pointer) {
        serial.send(token::JUMP_BAD_SP);
        return Err(Error::InvalidEntryState);
    }

    if !config.exec_window.contains(&reset) {
        serial.send(token::JUMP_BAD_RESET);
        return Err(Error::InvalidEntryState);
    }

    serial.send(token::JUMPING);
    Ok(Entry {
        vector_base: base,
        stack_pointer: head.stack_pointer,
        reset_vector: reset,
    })
}
