//! Memory instructions

use sable_primitives::U256;

use super::{as_usize, charge, charge_memory, grow_memory, Control, InstructionResult};
use crate::gas;
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn mload<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    let offset = as_usize(m.stack.peek(0)?)?;
    charge_memory(m, offset, 32)?;
    grow_memory(m, offset, 32)?;
    let word = m.memory.get_word(offset);
    m.stack.set(0, word)?;
    Ok(Control::Continue(1))
}

pub(crate) fn mstore<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(2)?;
    let offset = as_usize(m.stack.peek(0)?)?;
    charge_memory(m, offset, 32)?;
    m.stack.pop()?;
    let value = m.stack.pop()?;
    grow_memory(m, offset, 32)?;
    m.memory.set(offset, &value.to_big_endian(), 32)?;
    Ok(Control::Continue(1))
}

pub(crate) fn mstore8<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(2)?;
    let offset = as_usize(m.stack.peek(0)?)?;
    charge_memory(m, offset, 1)?;
    m.stack.pop()?;
    let value = m.stack.pop()?;
    grow_memory(m, offset, 1)?;
    m.memory.set(offset, &[value.low_u64() as u8], 1)?;
    Ok(Control::Continue(1))
}

pub(crate) fn msize<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::from(m.memory.len() as u64))?;
    Ok(Control::Continue(1))
}

/// Copy `size` bytes from `src` to `dst` within memory (EIP-5656)
pub(crate) fn mcopy<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(3)?;
    let size = as_usize(m.stack.peek(2)?)?;
    charge(m, gas::very_low_copy(size))?;
    if size == 0 {
        for _ in 0..3 {
            m.stack.pop()?;
        }
        return Ok(Control::Continue(1));
    }

    let dst = as_usize(m.stack.peek(0)?)?;
    let src = as_usize(m.stack.peek(1)?)?;
    charge_memory(m, dst.max(src), size)?;
    for _ in 0..3 {
        m.stack.pop()?;
    }
    grow_memory(m, dst.max(src), size)?;
    m.memory.copy_within(dst, src, size)?;
    Ok(Control::Continue(1))
}
