//! Instruction handlers, grouped by opcode family.
//!
//! The machine charges [`static_gas`](crate::gas::static_gas) before
//! dispatch. Handlers charge any variable cost next, then validate and pop
//! operands, then perform their effect. A handler that fails leaves the
//! stack and memory as they were, apart from gas already charged.

mod arithmetic;
mod bitwise;
mod control;
mod host;
mod memory;
mod stack;
mod system;

use sable_primitives::U256;

use crate::error::{ExitError, ExitReason, ExitSuccess};
use crate::handler::InterpreterHandler;
use crate::machine::Machine;
use crate::opcode::Opcode;

/// What the machine should do after an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Control {
    /// Advance pc by this many bytes
    Continue(usize),
    /// Set pc to a validated target
    Jump(usize),
    /// Halt for the host
    Trap(Opcode),
    /// Terminate
    Exit(ExitReason),
}

pub(crate) type InstructionResult = Result<Control, ExitError>;

/// Dispatch `opcode` to its handler
pub(crate) fn eval<H: InterpreterHandler>(m: &mut Machine<H>, opcode: Opcode) -> InstructionResult {
    use Opcode::*;

    match opcode {
        STOP => Ok(Control::Exit(ExitSuccess::Stop.into())),

        ADD => arithmetic::add(m),
        MUL => arithmetic::mul(m),
        SUB => arithmetic::sub(m),
        DIV => arithmetic::div(m),
        SDIV => arithmetic::sdiv(m),
        MOD => arithmetic::rem(m),
        SMOD => arithmetic::smod(m),
        ADDMOD => arithmetic::addmod(m),
        MULMOD => arithmetic::mulmod(m),
        EXP => arithmetic::exp(m),
        SIGNEXTEND => arithmetic::signextend(m),

        LT => bitwise::lt(m),
        GT => bitwise::gt(m),
        SLT => bitwise::slt(m),
        SGT => bitwise::sgt(m),
        EQ => bitwise::eq(m),
        ISZERO => bitwise::iszero(m),
        AND => bitwise::and(m),
        OR => bitwise::or(m),
        XOR => bitwise::xor(m),
        NOT => bitwise::not(m),
        BYTE => bitwise::byte(m),
        SHL => bitwise::shl(m),
        SHR => bitwise::shr(m),
        SAR => bitwise::sar(m),

        SHA3 => system::sha3(m),
        CALLDATALOAD => system::calldataload(m),
        CALLDATASIZE => system::calldatasize(m),
        CALLDATACOPY => system::calldatacopy(m),
        CODESIZE => system::codesize(m),
        CODECOPY => system::codecopy(m),
        GAS => system::gas(m),

        POP => stack::pop(m),
        MLOAD => memory::mload(m),
        MSTORE => memory::mstore(m),
        MSTORE8 => memory::mstore8(m),
        MSIZE => memory::msize(m),
        MCOPY => memory::mcopy(m),

        JUMP => control::jump(m),
        JUMPI => control::jumpi(m),
        PC => control::pc(m),
        JUMPDEST => Ok(Control::Continue(1)),
        RETURN => control::ret(m),
        REVERT => control::revert(m),
        INVALID => Err(ExitError::DesignatedInvalid),

        PUSH0 => stack::push0(m),
        op if op.push_size() > 0 => stack::push(m, op.push_size()),
        op if op.dup_depth() > 0 => stack::dup(m, op.dup_depth()),
        op if op.swap_depth() > 0 => stack::swap(m, op.swap_depth()),

        op if op.is_eof() => Err(ExitError::InvalidOpcode(op.as_u8())),
        op => host::trap(m, op),
    }
}

/// Convert an offset, size or jump target that must fit `usize`
#[inline]
pub(crate) fn as_usize(value: U256) -> Result<usize, ExitError> {
    value.to_usize().ok_or(ExitError::IntOverflow)
}

/// Convert a source offset or shift amount, saturating at `usize::MAX`
#[inline]
pub(crate) fn as_usize_saturated(value: U256) -> usize {
    value.to_usize().unwrap_or(usize::MAX)
}

/// Charge a computed cost; overflow in the computation counts as out of gas
#[inline]
pub(crate) fn charge<H: InterpreterHandler>(m: &mut Machine<H>, cost: Option<u64>) -> Result<(), ExitError> {
    match cost {
        Some(cost) if m.gas.record_cost(cost) => Ok(()),
        _ => Err(ExitError::OutOfGas),
    }
}

/// Charge for covering `offset..offset + size` without growing memory yet.
///
/// A range past the memory limit fails here, before any operand is popped.
#[inline]
pub(crate) fn charge_memory<H: InterpreterHandler>(
    m: &mut Machine<H>,
    offset: usize,
    size: usize,
) -> Result<(), ExitError> {
    if !m.memory.can_resize(offset, size) {
        return Err(ExitError::OutOfGas);
    }
    let cost = crate::gas::memory_expansion(m.memory.len(), offset, size);
    charge(m, cost)
}

/// Grow memory after its expansion has been paid for
#[inline]
pub(crate) fn grow_memory<H: InterpreterHandler>(
    m: &mut Machine<H>,
    offset: usize,
    size: usize,
) -> Result<(), ExitError> {
    if m.memory.resize(offset, size) {
        Ok(())
    } else {
        Err(ExitError::OutOfGas)
    }
}

/// Replace the top item with `f(top)`
#[inline]
pub(crate) fn unary<H: InterpreterHandler>(
    m: &mut Machine<H>,
    f: impl FnOnce(U256) -> U256,
) -> InstructionResult {
    let a = m.stack.peek(0)?;
    m.stack.set(0, f(a))?;
    Ok(Control::Continue(1))
}

/// Pop `a` (top) and `b`, push `f(a, b)`
#[inline]
pub(crate) fn binary<H: InterpreterHandler>(
    m: &mut Machine<H>,
    f: impl FnOnce(U256, U256) -> U256,
) -> InstructionResult {
    m.stack.require(2)?;
    let a = m.stack.pop()?;
    let b = m.stack.peek(0)?;
    m.stack.set(0, f(a, b))?;
    Ok(Control::Continue(1))
}

/// Pop `a` (top), `b` and `c`, push `f(a, b, c)`
#[inline]
pub(crate) fn ternary<H: InterpreterHandler>(
    m: &mut Machine<H>,
    f: impl FnOnce(U256, U256, U256) -> U256,
) -> InstructionResult {
    m.stack.require(3)?;
    let a = m.stack.pop()?;
    let b = m.stack.pop()?;
    let c = m.stack.peek(0)?;
    m.stack.set(0, f(a, b, c))?;
    Ok(Control::Continue(1))
}
