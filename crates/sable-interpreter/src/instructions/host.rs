//! Opcodes performed by the host

use super::{Control, InstructionResult};
use crate::handler::InterpreterHandler;
use crate::machine::Machine;
use crate::opcode::Opcode;

/// Ask the handler, then halt so the host can perform `opcode`.
///
/// pc stays on the opcode until [`Machine::resume_after_trap`].
pub(crate) fn trap<H: InterpreterHandler>(m: &mut Machine<H>, opcode: Opcode) -> InstructionResult {
    if let Err(e) = m
        .handler
        .before_opcode_execution(opcode, m.pc, &m.stack, &mut m.gas)
    {
        tracing::debug!(pc = m.pc, opcode = %opcode, error = %e, "Handler rejected opcode");
        return Err(e);
    }
    Ok(Control::Trap(opcode))
}
