//! # sable-interpreter
//!
//! Metered bytecode interpreter for an EVM-style stack machine.
//!
//! This crate provides:
//! - [`Machine`], the fetch-decode-execute loop and its status model
//! - [`Stack`], [`Memory`] and the [`Gas`] ledger
//! - The [`Opcode`] table and jump destination analysis ([`Valids`])
//! - The [`InterpreterHandler`] seam for host-performed opcodes
//!
//! ```
//! use sable_interpreter::{ExitReason, ExitSuccess, Machine, MachineStatus, NoopHandler, U256};
//!
//! // PUSH1 2 PUSH1 3 ADD
//! let mut machine = Machine::new(Vec::new(), vec![0x60, 0x02, 0x60, 0x03, 0x01], 100, NoopHandler);
//! let status = machine.eval_loop();
//!
//! assert_eq!(status, MachineStatus::Exit(ExitReason::Success(ExitSuccess::Stop)));
//! assert_eq!(machine.stack().peek(0).unwrap(), U256::from(5u64));
//! assert_eq!(machine.gas().remaining(), 91);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
pub mod gas;
mod handler;
mod instructions;
mod machine;
mod memory;
mod opcode;
mod stack;
mod valids;

pub use config::{Config, MEMORY_LIMIT, STACK_LIMIT};
pub use error::{ExitError, ExitFatal, ExitReason, ExitSuccess, MachineStatus};
pub use gas::Gas;
pub use handler::{InterpreterHandler, NoopHandler};
pub use machine::Machine;
pub use memory::Memory;
pub use opcode::Opcode;
pub use stack::Stack;
pub use valids::Valids;

pub use sable_primitives::U256;
