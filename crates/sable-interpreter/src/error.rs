//! Exit reasons and machine status

use thiserror::Error;

use crate::opcode::Opcode;

/// Recoverable execution error; halts the machine with `Exit(Error(_))`
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitError {
    /// Pop or peek past the bottom of the stack
    #[error("stack underflow")]
    StackUnderflow,

    /// Push past the stack limit
    #[error("stack overflow")]
    StackOverflow,

    /// Jump target is not a JUMPDEST instruction start
    #[error("invalid jump destination")]
    InvalidJump,

    /// Memory access outside the allocated range
    #[error("invalid memory range")]
    InvalidRange,

    /// The INVALID (0xfe) opcode was executed
    #[error("designated invalid opcode")]
    DesignatedInvalid,

    /// Byte that does not decode to an executable opcode
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// Call depth limit reached
    #[error("call too deep")]
    CallTooDeep,

    /// Offset past the end of a return data buffer
    #[error("out of offset")]
    OutOfOffset,

    /// Gas exhausted
    #[error("out of gas")]
    OutOfGas,

    /// Insufficient balance for a value transfer
    #[error("out of fund")]
    OutOfFund,

    /// Operand does not fit the host's addressable range
    #[error("integer overflow on operand conversion")]
    IntOverflow,
}

/// Fatal error raised by the host environment rather than the program
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum ExitFatal {
    /// Operation not supported by this machine
    #[error("not supported")]
    NotSupported,

    /// A trap was left unhandled by the host
    #[error("unhandled interrupt")]
    UnhandledInterrupt,

    /// Other host failure
    #[error("fatal: {0}")]
    Other(String),
}

/// Successful termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitSuccess {
    /// STOP or falling off the end of code
    Stop,
    /// RETURN
    Return,
}

/// Terminal outcome of an execution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// Halted normally
    Success(ExitSuccess),
    /// REVERT
    Revert,
    /// Program error
    Error(ExitError),
    /// Host error
    Fatal(ExitFatal),
}

impl ExitReason {
    /// Check for a successful exit
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Check for a revert
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Revert)
    }

    /// Check for an error or fatal exit
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Fatal(_))
    }
}

impl From<ExitSuccess> for ExitReason {
    fn from(s: ExitSuccess) -> Self {
        Self::Success(s)
    }
}

impl From<ExitError> for ExitReason {
    fn from(e: ExitError) -> Self {
        Self::Error(e)
    }
}

impl From<ExitFatal> for ExitReason {
    fn from(e: ExitFatal) -> Self {
        Self::Fatal(e)
    }
}

/// Machine execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineStatus {
    /// Nothing executed yet
    NotStarted,
    /// Last instruction consumed this many bytes
    Continue(usize),
    /// Last instruction jumped to this pc
    Jump(usize),
    /// Host must handle this opcode before execution resumes
    Trap(Opcode),
    /// Terminal
    Exit(ExitReason),
}

impl MachineStatus {
    /// Check whether the loop may not advance without outside help
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Trap(_) | Self::Exit(_))
    }

    /// Exit reason, if terminal
    pub fn exit_reason(&self) -> Option<&ExitReason> {
        match self {
            Self::Exit(reason) => Some(reason),
            _ => None,
        }
    }
}
