//! Comparison and bitwise instructions

use sable_primitives::U256;

use super::{as_usize_saturated, binary, unary, InstructionResult};
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn lt<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| U256::from(a < b))
}

pub(crate) fn gt<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| U256::from(a > b))
}

pub(crate) fn slt<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| U256::from(a.signed_lt(&b)))
}

pub(crate) fn sgt<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| U256::from(b.signed_lt(&a)))
}

pub(crate) fn eq<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| U256::from(a == b))
}

pub(crate) fn iszero<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    unary(m, |a| U256::from(a.is_zero()))
}

pub(crate) fn and<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a & b)
}

pub(crate) fn or<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a | b)
}

pub(crate) fn xor<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a ^ b)
}

pub(crate) fn not<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    unary(m, |a| !a)
}

/// Byte `i` (top) of `x`, counted from the most significant end
pub(crate) fn byte<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |i, x| x.byte(i))
}

// Shift amounts of 256 or more shift every bit out.

pub(crate) fn shl<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |shift, value| value << as_usize_saturated(shift))
}

pub(crate) fn shr<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |shift, value| value >> as_usize_saturated(shift))
}

pub(crate) fn sar<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |shift, value| value.arithmetic_shr(as_usize_saturated(shift)))
}
