//! Stack instructions

use sable_primitives::U256;

use super::{Control, InstructionResult};
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn pop<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.pop()?;
    Ok(Control::Continue(1))
}

pub(crate) fn push0<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::ZERO)?;
    Ok(Control::Continue(1))
}

/// Push the `n` immediate bytes after the opcode; bytes past the end of
/// code read as zero
pub(crate) fn push<H: InterpreterHandler>(m: &mut Machine<H>, n: usize) -> InstructionResult {
    let start = m.pc + 1;
    let end = (start + n).min(m.code.len());
    let mut immediate = [0u8; 32];
    if start < end {
        immediate[..end - start].copy_from_slice(&m.code[start..end]);
    }
    m.stack.push(U256::from_big_endian(&immediate[..n]))?;
    Ok(Control::Continue(1 + n))
}

pub(crate) fn dup<H: InterpreterHandler>(m: &mut Machine<H>, depth: usize) -> InstructionResult {
    m.stack.dup(depth)?;
    Ok(Control::Continue(1))
}

pub(crate) fn swap<H: InterpreterHandler>(m: &mut Machine<H>, depth: usize) -> InstructionResult {
    m.stack.swap(depth)?;
    Ok(Control::Continue(1))
}
