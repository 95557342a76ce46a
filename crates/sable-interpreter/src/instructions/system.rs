//! Environment and hashing instructions served from the machine itself

use bytes::Bytes;
use sable_primitives::U256;
use sha3::{Digest, Keccak256};

use super::{
    as_usize, as_usize_saturated, charge, charge_memory, grow_memory, Control, InstructionResult,
};
use crate::gas;
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn codesize<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::from(m.code.len() as u64))?;
    Ok(Control::Continue(1))
}

pub(crate) fn calldatasize<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::from(m.data.len() as u64))?;
    Ok(Control::Continue(1))
}

/// Gas left after this instruction's own charge
pub(crate) fn gas<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::from(m.gas.remaining()))?;
    Ok(Control::Continue(1))
}

/// Load the 32-byte call data word at the offset on top, zero-filled past the end
pub(crate) fn calldataload<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    let offset = as_usize_saturated(m.stack.peek(0)?);
    let mut word = [0u8; 32];
    if offset < m.data.len() {
        let end = offset.saturating_add(32).min(m.data.len());
        word[..end - offset].copy_from_slice(&m.data[offset..end]);
    }
    m.stack.set(0, U256::from(word))?;
    Ok(Control::Continue(1))
}

pub(crate) fn codecopy<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    let code = m.code.clone();
    copy_to_memory(m, &code)
}

pub(crate) fn calldatacopy<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    let data = m.data.clone();
    copy_to_memory(m, &data)
}

/// Shared body of CODECOPY and CALLDATACOPY.
///
/// Stack: `memory_offset, source_offset, size`. A zero size pays only the
/// very-low base and touches nothing but the stack.
fn copy_to_memory<H: InterpreterHandler>(m: &mut Machine<H>, source: &Bytes) -> InstructionResult {
    m.stack.require(3)?;
    let size = as_usize(m.stack.peek(2)?)?;
    charge(m, gas::very_low_copy(size))?;
    if size == 0 {
        for _ in 0..3 {
            m.stack.pop()?;
        }
        return Ok(Control::Continue(1));
    }

    let memory_offset = as_usize(m.stack.peek(0)?)?;
    let source_offset = as_usize_saturated(m.stack.peek(1)?);
    charge_memory(m, memory_offset, size)?;
    for _ in 0..3 {
        m.stack.pop()?;
    }
    grow_memory(m, memory_offset, size)?;
    m.memory.copy_data(memory_offset, source_offset, size, source)?;
    Ok(Control::Continue(1))
}

/// Keccak-256 of `size` bytes of memory at `offset`
pub(crate) fn sha3<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(2)?;
    let size = as_usize(m.stack.peek(1)?)?;
    let offset = if size == 0 { 0 } else { as_usize(m.stack.peek(0)?)? };
    charge(m, gas::sha3_cost(size))?;
    charge_memory(m, offset, size)?;
    m.stack.pop()?;
    grow_memory(m, offset, size)?;

    let hash = Keccak256::digest(m.memory.get(offset, size));
    m.stack.set(0, U256::from_big_endian(&hash))?;
    Ok(Control::Continue(1))
}
