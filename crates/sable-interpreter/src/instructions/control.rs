//! Control flow instructions

use sable_primitives::U256;

use super::{as_usize, charge_memory, grow_memory, Control, InstructionResult};
use crate::error::{ExitError, ExitReason, ExitSuccess};
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn jump<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    let target = m.stack.peek(0)?;
    let target = as_usize(target)?;
    m.stack.pop()?;
    jump_to(m, target)
}

/// Conditional jump; a zero condition falls through without looking at the target
pub(crate) fn jumpi<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(2)?;
    let target = m.stack.peek(0)?;
    let condition = m.stack.peek(1)?;
    if condition.is_zero() {
        m.stack.pop()?;
        m.stack.pop()?;
        return Ok(Control::Continue(1));
    }
    let target = as_usize(target)?;
    m.stack.pop()?;
    m.stack.pop()?;
    jump_to(m, target)
}

fn jump_to<H: InterpreterHandler>(m: &Machine<H>, target: usize) -> InstructionResult {
    if m.valids.is_valid(target) {
        Ok(Control::Jump(target))
    } else {
        Err(ExitError::InvalidJump)
    }
}

pub(crate) fn pc<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.push(U256::from(m.pc as u64))?;
    Ok(Control::Continue(1))
}

pub(crate) fn ret<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    set_return_range(m)?;
    Ok(Control::Exit(ExitSuccess::Return.into()))
}

pub(crate) fn revert<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    set_return_range(m)?;
    Ok(Control::Exit(ExitReason::Revert))
}

/// Pay for and record the `offset, size` memory range on top of the stack
fn set_return_range<H: InterpreterHandler>(m: &mut Machine<H>) -> Result<(), ExitError> {
    m.stack.require(2)?;
    let size = as_usize(m.stack.peek(1)?)?;
    let offset = if size == 0 { 0 } else { as_usize(m.stack.peek(0)?)? };
    charge_memory(m, offset, size)?;
    m.stack.pop()?;
    m.stack.pop()?;
    grow_memory(m, offset, size)?;
    m.return_range = offset..offset + size;
    Ok(())
}
