//! Arithmetic instructions

use super::{binary, charge, ternary, InstructionResult};
use crate::gas;
use crate::handler::InterpreterHandler;
use crate::machine::Machine;

pub(crate) fn add<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a + b)
}

pub(crate) fn mul<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a * b)
}

pub(crate) fn sub<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a - b)
}

pub(crate) fn div<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a.div_rem(b).map(|(q, _)| q).unwrap_or_default())
}

pub(crate) fn sdiv<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a.signed_div(b))
}

pub(crate) fn rem<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a.div_rem(b).map(|(_, r)| r).unwrap_or_default())
}

pub(crate) fn smod<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |a, b| a.signed_rem(b))
}

pub(crate) fn addmod<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    ternary(m, |a, b, n| a.add_mod(b, n))
}

pub(crate) fn mulmod<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    ternary(m, |a, b, n| a.mul_mod(b, n))
}

/// `base ** exponent`, charging 50 per exponent byte before popping
pub(crate) fn exp<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    m.stack.require(2)?;
    let exponent = m.stack.peek(1)?;
    charge(m, Some(gas::exp_cost(&exponent)))?;
    binary(m, |base, exponent| base.pow(exponent))
}

/// Extend the sign of byte `b` (top) of `x`
pub(crate) fn signextend<H: InterpreterHandler>(m: &mut Machine<H>) -> InstructionResult {
    binary(m, |b, x| x.sign_extend(b))
}

