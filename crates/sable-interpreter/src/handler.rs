//! Host callback seam

use crate::error::ExitError;
use crate::gas::Gas;
use crate::opcode::Opcode;
use crate::stack::Stack;

/// Host hooks invoked before an opcode with externally observable effects.
///
/// Returning an error aborts the step with `Exit(Error(_))` before the
/// opcode runs; otherwise the machine traps on the opcode so the host can
/// perform it.
pub trait InterpreterHandler {
    /// Called with the opcode, its pc, the current stack and the gas ledger.
    /// The host may charge its own costs through `gas`.
    fn before_opcode_execution(
        &mut self,
        opcode: Opcode,
        pc: usize,
        stack: &Stack,
        gas: &mut Gas,
    ) -> Result<(), ExitError>;
}

/// Handler that accepts every opcode
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl InterpreterHandler for NoopHandler {
    fn before_opcode_execution(
        &mut self,
        _opcode: Opcode,
        _pc: usize,
        _stack: &Stack,
        _gas: &mut Gas,
    ) -> Result<(), ExitError> {
        Ok(())
    }
}

impl<H: InterpreterHandler + ?Sized> InterpreterHandler for Box<H> {
    fn before_opcode_execution(
        &mut self,
        opcode: Opcode,
        pc: usize,
        stack: &Stack,
        gas: &mut Gas,
    ) -> Result<(), ExitError> {
        (**self).before_opcode_execution(opcode, pc, stack, gas)
    }
}

impl<H: InterpreterHandler + ?Sized> InterpreterHandler for &mut H {
    fn before_opcode_execution(
        &mut self,
        opcode: Opcode,
        pc: usize,
        stack: &Stack,
        gas: &mut Gas,
    ) -> Result<(), ExitError> {
        (**self).before_opcode_execution(opcode, pc, stack, gas)
    }
}
