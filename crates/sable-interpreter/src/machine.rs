//! Execution state machine

use std::ops::Range;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{ExitError, ExitReason, ExitSuccess, MachineStatus};
use crate::gas::{self, Gas};
use crate::handler::InterpreterHandler;
use crate::instructions::{self, Control};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::stack::Stack;
use crate::valids::Valids;

/// One execution of a code buffer.
///
/// The machine owns its stack, memory and gas ledger exclusively. Opcodes
/// with host effects call the injected handler and then halt with
/// [`MachineStatus::Trap`]; the host performs the effect through the
/// `*_mut` accessors and calls [`Machine::resume_after_trap`].
pub struct Machine<H> {
    pub(crate) data: Bytes,
    pub(crate) code: Bytes,
    pub(crate) pc: usize,
    pub(crate) return_range: Range<usize>,
    pub(crate) valids: Valids,
    pub(crate) stack: Stack,
    pub(crate) memory: Memory,
    pub(crate) gas: Gas,
    pub(crate) status: MachineStatus,
    pub(crate) handler: H,
    config: Config,
}

impl<H: InterpreterHandler> Machine<H> {
    /// Create a machine with the default (London) configuration
    pub fn new(data: impl Into<Bytes>, code: impl Into<Bytes>, gas_limit: u64, handler: H) -> Self {
        Self::with_config(data, code, gas_limit, handler, Config::default())
    }

    /// Create a machine with an explicit configuration
    pub fn with_config(
        data: impl Into<Bytes>,
        code: impl Into<Bytes>,
        gas_limit: u64,
        handler: H,
        config: Config,
    ) -> Self {
        let code = code.into();
        let valids = Valids::new(&code);
        Self {
            data: data.into(),
            code,
            pc: 0,
            return_range: 0..0,
            valids,
            stack: Stack::new(config.stack_limit),
            memory: Memory::new(config.memory_limit),
            gas: Gas::new(gas_limit),
            status: MachineStatus::NotStarted,
            handler,
            config,
        }
    }

    /// Run until the machine exits or traps
    pub fn eval_loop(&mut self) -> MachineStatus {
        loop {
            let status = self.step();
            if status.is_halted() {
                return status;
            }
        }
    }

    /// Execute a single instruction.
    ///
    /// A machine that has already exited or trapped returns its status
    /// unchanged.
    pub fn step(&mut self) -> MachineStatus {
        if self.status.is_halted() {
            return self.status.clone();
        }

        let status = self.execute_next();
        match &status {
            MachineStatus::Exit(reason) => {
                tracing::debug!(
                    pc = self.pc,
                    reason = ?reason,
                    gas_spent = self.gas.spent(),
                    "Machine exited"
                );
            }
            MachineStatus::Trap(opcode) => {
                tracing::debug!(pc = self.pc, opcode = %opcode, "Machine trapped");
            }
            _ => {}
        }
        self.status = status.clone();
        status
    }

    fn execute_next(&mut self) -> MachineStatus {
        let Some(&byte) = self.code.get(self.pc) else {
            return MachineStatus::Exit(ExitSuccess::Stop.into());
        };
        let Some(opcode) = Opcode::from_byte(byte) else {
            return MachineStatus::Exit(ExitError::InvalidOpcode(byte).into());
        };

        tracing::trace!(
            pc = self.pc,
            opcode = %opcode,
            gas = self.gas.remaining(),
            stack = self.stack.len(),
            "Step"
        );

        if !self.gas.record_cost(gas::static_gas(opcode)) {
            return MachineStatus::Exit(ExitError::OutOfGas.into());
        }

        match instructions::eval(self, opcode) {
            Ok(Control::Continue(n)) => {
                self.pc += n;
                MachineStatus::Continue(n)
            }
            Ok(Control::Jump(target)) => {
                self.pc = target;
                MachineStatus::Jump(target)
            }
            Ok(Control::Trap(opcode)) => MachineStatus::Trap(opcode),
            Ok(Control::Exit(reason)) => MachineStatus::Exit(reason),
            Err(e) => MachineStatus::Exit(e.into()),
        }
    }

    /// Step past a trapped opcode and keep running.
    ///
    /// Does nothing unless the machine is trapped.
    pub fn resume_after_trap(&mut self) -> MachineStatus {
        if !matches!(self.status, MachineStatus::Trap(_)) {
            return self.status.clone();
        }
        self.pc += 1;
        self.status = MachineStatus::Continue(1);
        self.eval_loop()
    }

    /// Halt with `reason`, e.g. when the host fails while handling a trap
    pub fn exit(&mut self, reason: ExitReason) {
        tracing::debug!(pc = self.pc, reason = ?reason, "Machine exited by host");
        self.status = MachineStatus::Exit(reason);
    }

    /// Bytes of the return range, zero-filled past the end of memory
    pub fn return_value(&self) -> Vec<u8> {
        self.memory
            .get(self.return_range.start, self.return_range.len())
    }

    /// Clamp the refund counter under the configured ruleset
    pub fn finalize_refund(&mut self) {
        self.gas.set_final_refund(self.config.london);
    }

    /// Current status
    pub fn status(&self) -> &MachineStatus {
        &self.status
    }

    /// Program counter
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Program code
    pub fn code(&self) -> &Bytes {
        &self.code
    }

    /// Call input
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Memory range set by RETURN or REVERT
    pub fn return_range(&self) -> &Range<usize> {
        &self.return_range
    }

    /// Jump destination map
    pub fn valids(&self) -> &Valids {
        &self.valids
    }

    /// Stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Mutable stack
    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Memory
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Gas ledger
    pub fn gas(&self) -> &Gas {
        &self.gas
    }

    /// Mutable gas ledger
    pub fn gas_mut(&mut self) -> &mut Gas {
        &mut self.gas
    }

    /// Injected handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable injected handler
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
